//! railway-mcp: MCP protocol server for the Railway CLI
//!
//! Exposes the tool registry over three transports:
//! - stdio (newline-delimited JSON-RPC on stdin/stdout)
//! - SSE event streams with a companion message-post endpoint
//! - stateless HTTP request/response cycles

pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

// Re-export main types
pub use protocol::{JsonRpcError, McpRequest, McpResponse};
pub use server::McpServer;
pub use session::{SessionHandle, SessionRegistry};

/// Server name advertised in `initialize` and on the health endpoint
pub const SERVER_NAME: &str = "railway-mcp-server";

/// Server version
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";
