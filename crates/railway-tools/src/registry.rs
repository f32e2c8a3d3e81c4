//! Tool Registry
//!
//! A fixed name→tool mapping built once at startup from an explicit list.
//! Registration after construction is not supported; the registry is shared
//! read-only across every server instance.

use std::collections::HashMap;
use tracing::debug;

use crate::tool::BoxedTool;

/// Immutable registry of callable tools
pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    /// Build the registry from an explicit tool list. A duplicate name is a
    /// startup bug and panics rather than shadowing silently.
    pub fn from_tools(tools: Vec<BoxedTool>) -> Self {
        let mut map = HashMap::with_capacity(tools.len());
        for tool in tools {
            let name = tool.name().to_string();
            debug!(tool = %name, "Registering tool");
            if map.insert(name.clone(), tool).is_some() {
                panic!("duplicate tool registered: {name}");
            }
        }
        Self { tools: map }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&BoxedTool> {
        self.tools.get(name)
    }

    /// All tools, sorted by name for stable listings.
    pub fn list(&self) -> Vec<&BoxedTool> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
