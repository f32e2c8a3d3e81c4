//! railway-mcp-server: Railway CLI over MCP
//!
//! Transport selection mirrors the deployment convention:
//!   railway-mcp-server                    # stdio (local MCP clients)
//!   railway-mcp-server --http 0.0.0.0:8000
//!   PORT=8000 railway-mcp-server          # HTTP (hosted deployments)
//!   USE_SSE=true railway-mcp-server       # HTTP via env toggle

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use railway_cli::{CommandExecutor, CredentialStore};
use railway_core::ServerSettings;
use railway_mcp::transport::{serve, AppState, StdioTransport};
use railway_mcp::McpServer;
use railway_tools::{builtin_tools, ToolRegistry};

#[derive(Parser)]
#[command(name = "railway-mcp-server")]
#[command(about = "MCP server exposing the Railway CLI over stdio, SSE, and HTTP")]
struct Cli {
    /// Force the stdio transport
    #[arg(long)]
    stdio: bool,

    /// Run the HTTP transports on the given address (host:port)
    #[arg(long, value_name = "ADDR")]
    http: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr so the stdio transport owns stdout.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let credentials = Arc::new(CredentialStore::new());
    let executor = Arc::new(CommandExecutor::new(credentials.clone()));
    let registry = Arc::new(ToolRegistry::from_tools(builtin_tools(executor)));
    info!(tools = registry.len(), "Tool registry initialized");

    let use_http = cli.http.is_some() || (!cli.stdio && ServerSettings::http_requested());

    if use_http {
        let addr = cli
            .http
            .unwrap_or_else(|| ServerSettings::from_env().bind_addr());
        info!("Starting Railway MCP Server with HTTP transports");

        let state = AppState::new(registry, credentials);
        serve(state, &addr).await?;
    } else {
        info!("Starting Railway MCP Server with stdio transport");

        let server = Arc::new(McpServer::new(registry));
        StdioTransport::new().serve(server).await?;
    }

    Ok(())
}
