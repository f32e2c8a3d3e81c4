//! Deployment tools

use anyhow::Result;
use async_trait::async_trait;
use railway_cli::CommandExecutor;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::tool::{optional_str, quote_arg, require_str, Tool};

/// Deploys a directory with `railway up`.
pub struct DeployTool {
    executor: Arc<CommandExecutor>,
}

impl DeployTool {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for DeployTool {
    fn name(&self) -> &str {
        "deploy"
    }

    fn title(&self) -> &str {
        "Deploy to Railway"
    }

    fn description(&self) -> &str {
        "Deploy the given directory to Railway with 'railway up'. The directory \
         must belong to a linked Railway project."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "workingDirectory": {
                    "type": "string",
                    "description": "Absolute path of the directory to deploy"
                },
                "service": {
                    "type": "string",
                    "description": "Service name or ID to deploy to"
                },
                "environment": {
                    "type": "string",
                    "description": "Environment to deploy to (defaults to the linked environment)"
                }
            },
            "required": ["workingDirectory"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let working_dir = require_str(&input, "workingDirectory")?;

        let mut command = String::from("railway up --ci");
        if let Some(service) = optional_str(&input, "service") {
            command.push_str(&format!(" --service {}", quote_arg(service)?));
        }
        if let Some(environment) = optional_str(&input, "environment") {
            command.push_str(&format!(" --environment {}", quote_arg(environment)?));
        }

        let output = self.executor.run(&command, Some(Path::new(working_dir))).await?;
        Ok(format!(
            "✅ Deployment Started\n\n{}",
            output.combined().trim()
        ))
    }
}

/// Redeploys the latest deployment of a service.
pub struct RedeployTool {
    executor: Arc<CommandExecutor>,
}

impl RedeployTool {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for RedeployTool {
    fn name(&self) -> &str {
        "redeploy"
    }

    fn title(&self) -> &str {
        "Redeploy Service"
    }

    fn description(&self) -> &str {
        "Redeploy the most recent deployment of a service with 'railway redeploy'."
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
                    "description": "Service name or ID to redeploy"
                }
            },
            "required": ["workingDirectory"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let working_dir = require_str(&input, "workingDirectory")?;

        let mut command = String::from("railway redeploy --yes");
        if let Some(service) = optional_str(&input, "service") {
            command.push_str(&format!(" --service {}", quote_arg(service)?));
        }

        let output = self.executor.run(&command, Some(Path::new(working_dir))).await?;
        Ok(format!("✅ Redeploy Triggered\n\n{}", output.combined().trim()))
    }
}
