//! Stdio Transport
//!
//! Standard MCP transport over stdin/stdout: one JSON-RPC frame per line.
//! Logging goes to stderr so stdout stays protocol-clean.

use railway_core::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use crate::server::McpServer;

/// Stdio transport - reads JSON-RPC from stdin, writes to stdout
pub struct StdioTransport;

impl StdioTransport {
    pub fn new() -> Self {
        Self
    }

    /// Serve requests until stdin reaches EOF.
    pub async fn serve(self, server: Arc<McpServer>) -> Result<()> {
        info!("Starting MCP stdio transport");

        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin).lines();

        while let Some(line) = reader.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!(request = %line, "Received request");

            let response = match serde_json::from_str::<McpRequest>(line) {
                Ok(request) => match server.handle_request(request).await {
                    Some(response) => response,
                    // Notification: nothing to write back.
                    None => continue,
                },
                Err(e) => {
                    error!(error = %e, "Parse error");
                    McpResponse::error(None, JsonRpcError::parse_error(e.to_string()))
                }
            };

            let frame = serde_json::to_string(&response)
                .map_err(|e| railway_core::Error::transport(e.to_string()))?;
            debug!(response = %frame, "Sending response");

            stdout.write_all(frame.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        info!("Stdio transport shutting down");
        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}
