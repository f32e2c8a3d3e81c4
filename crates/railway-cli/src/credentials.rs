//! Active credential slot
//!
//! The Railway CLI authenticates through two environment variables:
//! `RAILWAY_TOKEN` (project token) and `RAILWAY_API_TOKEN` (account/team
//! token). Remote callers may supply either per request through HTTP
//! headers; those values override the process environment for every
//! subprocess spawned while they are active.
//!
//! The store is a single process-wide slot, overwritten at the start of
//! every inbound HTTP request. It is NOT request-scoped: two requests
//! handled concurrently share the slot and the last writer wins. Deployments
//! that multiplex callers with different tokens over one server instance
//! must serialize their requests.

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Environment variable for project tokens
pub const TOKEN_VAR: &str = "RAILWAY_TOKEN";

/// Environment variable for account/team tokens
pub const API_TOKEN_VAR: &str = "RAILWAY_API_TOKEN";

/// A snapshot of the caller-supplied credential overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub api_token: Option<String>,
}

impl Credentials {
    /// Whether any override is present.
    pub fn any(&self) -> bool {
        self.token.is_some() || self.api_token.is_some()
    }
}

/// Process-wide slot holding the active credential overrides
#[derive(Debug, Default)]
pub struct CredentialStore {
    active: RwLock<Credentials>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active credentials. `None` means "no override" for that
    /// variable; both fields are overwritten unconditionally.
    pub fn set_active(&self, token: Option<String>, api_token: Option<String>) {
        let mut active = self
            .active
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        debug!(
            token_set = token.is_some(),
            api_token_set = api_token.is_some(),
            "Updating active credentials"
        );
        *active = Credentials { token, api_token };
    }

    /// Snapshot the currently active credentials.
    pub fn active(&self) -> Credentials {
        self.active
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Whether a header-supplied override is currently active.
    pub fn header_override_active(&self) -> bool {
        self.active().any()
    }

    /// Compose the execution environment for a subprocess: the full process
    /// environment with the credential variables overwritten by the active
    /// overrides when present, left untouched otherwise.
    pub fn compose_environment(&self) -> HashMap<String, String> {
        let mut env: HashMap<String, String> = std::env::vars().collect();
        let active = self.active();

        if let Some(token) = active.token {
            env.insert(TOKEN_VAR.to_string(), token);
        }
        if let Some(api_token) = active.api_token {
            env.insert(API_TOKEN_VAR.to_string(), api_token);
        }

        env
    }
}

/// Whether the process environment itself carries default tokens, reported
/// by the health endpoint. Header overrides do not count here.
pub fn env_tokens_present() -> (bool, bool) {
    (
        std::env::var(TOKEN_VAR).is_ok(),
        std::env::var(API_TOKEN_VAR).is_ok(),
    )
}
