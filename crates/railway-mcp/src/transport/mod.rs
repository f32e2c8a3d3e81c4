//! Transport Layer
//!
//! Three independent transports bind server instances to I/O channels:
//! - `stdio`: one server instance on stdin/stdout for the process lifetime
//! - `http`: the HTTP front door hosting the stateless adapter
//! - `sse`: the event-stream adapter (stream-open + message relay), mounted
//!   by the front door

pub mod http;
pub mod sse;
pub mod stdio;

pub use http::{router, serve, AppState, SharedState};
pub use stdio::StdioTransport;
