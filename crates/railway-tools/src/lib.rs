//! railway-tools: Tool trait, registry, and built-in Railway tools

pub mod builtin;
pub mod registry;
pub mod tool;

// Re-export main types
pub use builtin::builtin_tools;
pub use registry::ToolRegistry;
pub use tool::{BoxedTool, Tool};
