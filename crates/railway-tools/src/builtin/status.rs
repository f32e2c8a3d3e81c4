//! CLI status check tool

use anyhow::Result;
use async_trait::async_trait;
use railway_cli::{check_cli_status, CommandExecutor, TokenType};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::tool::Tool;

/// Verifies the Railway CLI installation and the configured authentication.
pub struct CheckRailwayStatusTool {
    executor: Arc<CommandExecutor>,
}

impl CheckRailwayStatusTool {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for CheckRailwayStatusTool {
    fn name(&self) -> &str {
        "check-railway-status"
    }

    fn title(&self) -> &str {
        "Check Railway CLI Status"
    }

    fn description(&self) -> &str {
        "Check whether the Railway CLI is installed and if the user is logged in. \
         This tool helps agents verify the Railway CLI setup before attempting to \
         use other Railway tools."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<String> {
        let status = match check_cli_status(&self.executor).await {
            Ok(status) => status,
            Err(e) => {
                return Ok(format!(
                    "❌ Railway CLI Status Check Failed\n\n\
                     **Error:** {e}\n\n\
                     **Next Steps:**\n\
                     • If Railway CLI is not installed: Install it from https://docs.railway.com/guides/cli\n\
                     • If not logged in: Set RAILWAY_TOKEN or RAILWAY_API_TOKEN environment variable\n\
                     • Or pass tokens via request headers: X-Railway-Token or X-Railway-Api-Token\n\n\
                     **Token Types:**\n\
                     • RAILWAY_TOKEN: Project token - limited to project-level commands\n\
                     • RAILWAY_API_TOKEN: Account/Team token - full access to all commands"
                ));
            }
        };

        let token_source = if self.executor.credentials().header_override_active() {
            "via request header"
        } else {
            "via environment variable"
        };

        let commands_hint = match status.token_type {
            TokenType::Project => {
                "• `railway up` - Deploy current directory\n\
                 • `railway logs` - View logs\n\
                 • `railway redeploy` - Redeploy service\n\n\
                 **Note:** Project tokens cannot use: `railway whoami`, `railway init`, `railway link`"
            }
            TokenType::Account | TokenType::Both => {
                "• All Railway CLI commands available\n\
                 • `railway whoami`, `railway init`, `railway link`, etc."
            }
            TokenType::None => {
                "• Please set RAILWAY_TOKEN or RAILWAY_API_TOKEN to use Railway commands"
            }
        };

        Ok(format!(
            "✅ Railway CLI Status Check Passed\n\n\
             **CLI Version:** {}\n\
             **Token Type:** {}\n\
             **Token Source:** {}\n\
             **Status:** {}\n\n\
             **Available Commands based on token type:**\n{}",
            status.version,
            status.token_type.label(),
            token_source,
            status.token_status,
            commands_hint,
        ))
    }
}
