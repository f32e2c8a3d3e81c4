//! Server settings from the environment
//!
//! Deployment configuration comes from environment variables so the server
//! can run unchanged inside a Railway service:
//!
//! - `HOST`: bind host (default `0.0.0.0`)
//! - `PORT`: bind port (default `8000`); setting it implies HTTP mode
//! - `USE_SSE`: `true` forces HTTP mode even without `PORT`

use tracing::debug;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_PORT: u16 = 8000;

/// Resolved server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        debug!(host = %host, port = %port, "Resolved server settings");
        Self { host, port }
    }

    /// The address to bind the HTTP listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the environment asks for the HTTP transports instead of stdio.
    ///
    /// Mirrors the deployment convention: a `PORT` variable (set by the
    /// hosting platform) or an explicit `USE_SSE=true` selects HTTP.
    pub fn http_requested() -> bool {
        let use_sse = std::env::var("USE_SSE")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        use_sse || std::env::var("PORT").is_ok()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
