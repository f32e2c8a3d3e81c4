//! railway-cli: Railway CLI invocation layer
//!
//! Wraps the `railway` binary behind an async executor:
//!
//! - `credentials`: the active credential override slot and environment
//!   composition
//! - `executor`: bounded-output subprocess execution with a JSON variant
//! - `status`: CLI installation and login probe

pub mod credentials;
pub mod executor;
pub mod status;

// Re-export main types
pub use credentials::{CredentialStore, Credentials, API_TOKEN_VAR, TOKEN_VAR};
pub use executor::{CommandExecutor, CommandOutput, MAX_OUTPUT_BYTES};
pub use status::{check_cli_status, CliStatus, TokenType};
