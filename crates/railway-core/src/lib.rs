//! Core types for the Railway MCP server
//!
//! # Modules
//!
//! - `config`: Server settings from the environment
//! - `error`: Error types and Result alias

pub mod config;
pub mod error;

// Re-exports
pub use config::ServerSettings;
pub use error::{Error, Result};
