//! Built-in Railway CLI tools

mod deploy;
mod logs;
mod projects;
mod status;

pub use deploy::{DeployTool, RedeployTool};
pub use logs::GetLogsTool;
pub use projects::{LinkProjectTool, ListProjectsTool};
pub use status::CheckRailwayStatusTool;

use railway_cli::CommandExecutor;
use std::sync::Arc;

use crate::tool::BoxedTool;

/// The complete built-in tool list. Every tool the server exposes is named
/// here; there is no runtime discovery.
pub fn builtin_tools(executor: Arc<CommandExecutor>) -> Vec<BoxedTool> {
    vec![
        Arc::new(CheckRailwayStatusTool::new(executor.clone())),
        Arc::new(DeployTool::new(executor.clone())),
        Arc::new(RedeployTool::new(executor.clone())),
        Arc::new(GetLogsTool::new(executor.clone())),
        Arc::new(ListProjectsTool::new(executor.clone())),
        Arc::new(LinkProjectTool::new(executor)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use railway_cli::CredentialStore;

    #[test]
    fn all_tools_have_distinct_names_and_schemas() {
        let executor = Arc::new(CommandExecutor::new(Arc::new(CredentialStore::new())));
        let tools = builtin_tools(executor);
        assert_eq!(tools.len(), 6);

        let mut names: Vec<_> = tools.iter().map(|t| t.name().to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);

        for tool in &tools {
            let schema = tool.input_schema();
            assert_eq!(schema.get("type").and_then(|v| v.as_str()), Some("object"));
            assert!(!tool.description().is_empty());
        }
    }
}
