//! Error types for the Railway MCP server

use thiserror::Error;

/// Main error type for server operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("command execution failed: {stderr}")]
    CommandExecutionFailed { stderr: String },

    #[error("command output exceeded {limit} bytes")]
    CommandOutputTooLarge { limit: usize },

    #[error("railway CLI returned malformed JSON: {0}")]
    MalformedJsonResponse(#[from] serde_json::Error),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("missing sessionId parameter")]
    MissingSessionIdentifier,

    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a command execution error carrying captured stderr
    pub fn command_failed(stderr: impl Into<String>) -> Self {
        Error::CommandExecutionFailed {
            stderr: stderr.into(),
        }
    }

    /// Create a session-not-found error
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Error::SessionNotFound(id.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_carries_stderr() {
        let err = Error::command_failed("Unauthorized. Please login with `railway login`");
        match err {
            Error::CommandExecutionFailed { ref stderr } => {
                assert!(stderr.contains("Unauthorized"));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn output_too_large_names_limit() {
        let err = Error::CommandOutputTooLarge {
            limit: 10 * 1024 * 1024,
        };
        assert!(err.to_string().contains("10485760"));
    }
}
