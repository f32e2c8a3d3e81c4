//! Core Tool trait
//!
//! Every remote-callable operation implements this trait; the MCP server
//! registers each one as a callable tool and wraps the returned text into
//! protocol content.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// One externally callable operation
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique identifier, e.g. `check-railway-status`
    fn name(&self) -> &str;

    /// Human-readable title
    fn title(&self) -> &str;

    /// Description shown to the caller when listing tools
    fn description(&self) -> &str;

    /// JSON schema for the tool input
    fn input_schema(&self) -> Value;

    /// Execute the tool, returning the formatted response text
    async fn execute(&self, input: Value) -> Result<String>;
}

/// Type alias for shared tools
pub type BoxedTool = Arc<dyn Tool>;

/// Read a required string field from a tool input object.
pub fn require_str<'a>(input: &'a Value, field: &str) -> Result<&'a str> {
    input
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {field}"))
}

/// Read an optional string field from a tool input object.
pub fn optional_str<'a>(input: &'a Value, field: &str) -> Option<&'a str> {
    input.get(field).and_then(|v| v.as_str())
}

/// Quote a caller-supplied value for interpolation into a shell command.
pub fn quote_arg(value: &str) -> Result<String> {
    shlex::try_quote(value)
        .map(|q| q.into_owned())
        .map_err(|_| anyhow::anyhow!("argument contains an unquotable NUL byte"))
}
