//! Project listing and linking tools

use anyhow::Result;
use async_trait::async_trait;
use railway_cli::CommandExecutor;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::tool::{optional_str, quote_arg, require_str, Tool};

/// Lists the projects visible to the configured account token.
pub struct ListProjectsTool {
    executor: Arc<CommandExecutor>,
}

impl ListProjectsTool {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for ListProjectsTool {
    fn name(&self) -> &str {
        "list-projects"
    }

    fn title(&self) -> &str {
        "List Railway Projects"
    }

    fn description(&self) -> &str {
        "List the Railway projects the configured account token can access. \
         Requires RAILWAY_API_TOKEN; project tokens cannot list projects."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<String> {
        let projects = self.executor.run_json("railway list --json", None).await?;

        let entries = projects.as_array().cloned().unwrap_or_default();
        if entries.is_empty() {
            return Ok("No projects found for this account.".to_string());
        }

        let mut lines = vec![format!("Found {} project(s):", entries.len())];
        for project in &entries {
            let name = project
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("(unnamed)");
            let id = project.get("id").and_then(|v| v.as_str()).unwrap_or("?");
            lines.push(format!("• **{name}** (`{id}`)"));
        }
        Ok(lines.join("\n"))
    }
}

/// Links a directory to a Railway project.
pub struct LinkProjectTool {
    executor: Arc<CommandExecutor>,
}

impl LinkProjectTool {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for LinkProjectTool {
    fn name(&self) -> &str {
        "link-project"
    }

    fn title(&self) -> &str {
        "Link Railway Project"
    }

    fn description(&self) -> &str {
        "Link a directory to a Railway project so deploy/logs tools can run in it."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "workingDirectory": {
                    "type": "string",
                    "description": "Directory to link"
                },
                "projectId": {
                    "type": "string",
                    "description": "Project ID to link to"
                },
                "environment": {
                    "type": "string",
                    "description": "Environment to link (defaults to production)"
                }
            },
            "required": ["workingDirectory", "projectId"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let working_dir = require_str(&input, "workingDirectory")?;
        let project_id = require_str(&input, "projectId")?;

        let mut command = format!("railway link --project {}", quote_arg(project_id)?);
        if let Some(environment) = optional_str(&input, "environment") {
            command.push_str(&format!(" --environment {}", quote_arg(environment)?));
        }

        let output = self.executor.run(&command, Some(Path::new(working_dir))).await?;
        Ok(format!(
            "✅ Linked project {project_id}\n\n{}",
            output.combined().trim()
        ))
    }
}
