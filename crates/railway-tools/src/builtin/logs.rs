//! Log retrieval tool

use anyhow::Result;
use async_trait::async_trait;
use railway_cli::CommandExecutor;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::tool::{optional_str, quote_arg, require_str, Tool};

/// Fetches service logs with `railway logs`.
pub struct GetLogsTool {
    executor: Arc<CommandExecutor>,
}

impl GetLogsTool {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for GetLogsTool {
    fn name(&self) -> &str {
        "get-logs"
    }

    fn title(&self) -> &str {
        "Get Railway Logs"
    }

    fn description(&self) -> &str {
        "Fetch recent deployment or build logs for a service in the linked project."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "workingDirectory": {
                    "type": "string",
                    "description": "Directory of the linked project"
                },
                "service": {
                    "type": "string",
                    "description": "Service name or ID to read logs from"
                },
                "environment": {
                    "type": "string",
                    "description": "Environment to read logs from"
                },
                "logType": {
                    "type": "string",
                    "enum": ["deployment", "build"],
                    "description": "Which log stream to read (default: deployment)"
                }
            },
            "required": ["workingDirectory"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let working_dir = require_str(&input, "workingDirectory")?;

        let mut command = String::from("railway logs");
        if optional_str(&input, "logType") == Some("build") {
            command.push_str(" --build");
        }
        if let Some(service) = optional_str(&input, "service") {
            command.push_str(&format!(" --service {}", quote_arg(service)?));
        }
        if let Some(environment) = optional_str(&input, "environment") {
            command.push_str(&format!(" --environment {}", quote_arg(environment)?));
        }

        let output = self.executor.run(&command, Some(Path::new(working_dir))).await?;
        let logs = output.stdout.trim();
        if logs.is_empty() {
            Ok("No log lines returned.".to_string())
        } else {
            Ok(format!("```\n{logs}\n```"))
        }
    }
}
