//! Railway CLI installation and login probe

use railway_core::{Error, Result};
use tracing::{debug, warn};

use crate::executor::CommandExecutor;
use crate::{API_TOKEN_VAR, TOKEN_VAR};

/// Which token variables the composed environment carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    None,
    /// `RAILWAY_TOKEN` only: limited to project-level commands
    Project,
    /// `RAILWAY_API_TOKEN`: full access to all commands
    Account,
    /// Both set; the CLI gives `RAILWAY_TOKEN` precedence
    Both,
}

impl TokenType {
    pub fn label(&self) -> &'static str {
        match self {
            TokenType::None => "none",
            TokenType::Project => "project",
            TokenType::Account => "account/team",
            TokenType::Both => "both (project takes precedence)",
        }
    }

    /// Whether an account/team token is available (`whoami` works).
    pub fn has_account(&self) -> bool {
        matches!(self, TokenType::Account | TokenType::Both)
    }
}

/// Result of the status probe
#[derive(Debug, Clone)]
pub struct CliStatus {
    pub version: String,
    pub token_type: TokenType,
    pub token_status: String,
}

fn classify(has_project: bool, has_account: bool) -> TokenType {
    match (has_project, has_account) {
        (true, true) => TokenType::Both,
        (true, false) => TokenType::Project,
        (false, true) => TokenType::Account,
        (false, false) => TokenType::None,
    }
}

/// Check that the Railway CLI is installed and describe the configured
/// authentication.
pub async fn check_cli_status(executor: &CommandExecutor) -> Result<CliStatus> {
    let version = match executor.run("railway --version", None).await {
        Ok(output) => output.stdout.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "Railway CLI version check failed");
            return Err(Error::command_failed(
                "railway CLI is not installed or not accessible",
            ));
        }
    };
    debug!(version = %version, "Railway CLI version");

    let env = executor.credentials().compose_environment();
    let token_type = classify(env.contains_key(TOKEN_VAR), env.contains_key(API_TOKEN_VAR));

    let mut token_status = match token_type {
        TokenType::None => "No token configured".to_string(),
        TokenType::Project => {
            "Project token configured (limited to project-level commands like \
             'railway up', 'railway logs', 'railway redeploy')"
                .to_string()
        }
        TokenType::Account => "Account/Team token configured (full access to all commands)".to_string(),
        TokenType::Both => {
            "Both tokens configured - RAILWAY_TOKEN takes precedence".to_string()
        }
    };

    // Project tokens can't run `whoami`; only validate account tokens.
    if token_type.has_account() {
        match executor.run("railway whoami", None).await {
            Ok(output) => {
                token_status = format!("Account/Team token valid - {}", output.stdout.trim());
            }
            Err(e) => {
                warn!(error = %e, "railway whoami failed");
                token_status =
                    "Account/Team token configured but may be invalid or expired".to_string();
            }
        }
    }

    Ok(CliStatus {
        version,
        token_type,
        token_status,
    })
}
