//! Bounded-output subprocess execution
//!
//! Runs `railway` commands through `bash -c` with the composed credential
//! environment, capturing both output streams. Capture is bounded: a
//! command whose output crosses the ceiling fails instead of exhausting
//! memory, and the child is killed.

use railway_core::{Error, Result};
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use crate::credentials::CredentialStore;

/// Upper bound on captured bytes per stream (10 MiB)
pub const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Captured output of a completed command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Concatenation of stdout and stderr, in that order.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Runs external commands with the active credential environment
pub struct CommandExecutor {
    credentials: Arc<CredentialStore>,
    max_output_bytes: usize,
}

impl CommandExecutor {
    pub fn new(credentials: Arc<CredentialStore>) -> Self {
        Self {
            credentials,
            max_output_bytes: MAX_OUTPUT_BYTES,
        }
    }

    /// Override the capture ceiling (tests, constrained deployments).
    pub fn with_output_limit(credentials: Arc<CredentialStore>, max_output_bytes: usize) -> Self {
        Self {
            credentials,
            max_output_bytes,
        }
    }

    /// The credential store this executor composes environments from.
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Run a command, capturing stdout and stderr.
    ///
    /// Fails with `CommandExecutionFailed` when the command cannot be
    /// spawned or exits non-zero (captured stderr attached), and with
    /// `CommandOutputTooLarge` when either stream crosses the ceiling.
    pub async fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        let env = self.credentials.compose_environment();

        info!(
            command = %command,
            token_set = env.contains_key(crate::TOKEN_VAR),
            api_token_set = env.contains_key(crate::API_TOKEN_VAR),
            header_override = self.credentials.header_override_active(),
            "Running command"
        );

        let mut cmd = Command::new("bash");
        cmd.arg("-c")
            .arg(command)
            .env_clear()
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::command_failed(format!("failed to spawn command: {e}")))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let cap = self.max_output_bytes;

        let (stdout_read, stderr_read) =
            tokio::join!(read_capped(stdout_pipe, cap), read_capped(stderr_pipe, cap));
        let (stdout_buf, stdout_over) = stdout_read?;
        let (stderr_buf, stderr_over) = stderr_read?;

        if stdout_over || stderr_over {
            // The reader stopped consuming; don't leave the child blocked
            // on a full pipe.
            let _ = child.start_kill();
            let _ = child.wait().await;
            return Err(Error::CommandOutputTooLarge { limit: cap });
        }

        let status = child.wait().await?;
        let stdout = String::from_utf8_lossy(&stdout_buf).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_buf).into_owned();

        if !stderr.is_empty() {
            debug!(stderr = %stderr, "Command stderr");
        }

        if !status.success() {
            debug!(code = ?status.code(), command = %command, "Command exited non-zero");
            return Err(Error::CommandExecutionFailed { stderr });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    /// Run a command and parse its stdout as JSON.
    ///
    /// A parse failure is a contract violation by the wrapped CLI, surfaced
    /// as `MalformedJsonResponse`.
    pub async fn run_json(&self, command: &str, cwd: Option<&Path>) -> Result<Value> {
        let output = self.run(command, cwd).await?;
        let value = serde_json::from_str(output.stdout.trim())?;
        Ok(value)
    }
}

/// Read a pipe up to `cap` bytes; the boolean reports whether the stream
/// had more.
async fn read_capped(
    pipe: Option<impl AsyncRead + Unpin>,
    cap: usize,
) -> Result<(Vec<u8>, bool)> {
    let Some(pipe) = pipe else {
        return Ok((Vec::new(), false));
    };
    let mut buf = Vec::new();
    let mut limited = pipe.take(cap as u64 + 1);
    limited.read_to_end(&mut buf).await?;
    let over = buf.len() > cap;
    buf.truncate(cap);
    Ok((buf, over))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> CommandExecutor {
        CommandExecutor::new(Arc::new(CredentialStore::new()))
    }

    #[tokio::test]
    async fn captures_stdout() {
        let output = executor().run("echo hello world", None).await.unwrap();
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn combined_concatenates_streams() {
        let output = executor().run("echo out; echo err >&2", None).await.unwrap();
        assert_eq!(output.combined(), "out\nerr\n");
    }

    #[tokio::test]
    async fn nonzero_exit_fails_with_stderr() {
        let err = executor()
            .run("echo oops >&2; exit 1", None)
            .await
            .unwrap_err();
        match err {
            Error::CommandExecutionFailed { stderr } => assert!(stderr.contains("oops")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_fails() {
        let err = executor()
            .run("definitely-not-a-real-binary-1b2c", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn output_over_ceiling_fails() {
        let executor =
            CommandExecutor::with_output_limit(Arc::new(CredentialStore::new()), 1024);
        let err = executor
            .run("head -c 4096 /dev/zero", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandOutputTooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn output_under_ceiling_succeeds() {
        let executor =
            CommandExecutor::with_output_limit(Arc::new(CredentialStore::new()), 1024);
        let output = executor.run("printf 'abc'", None).await.unwrap();
        assert_eq!(output.stdout, "abc");
    }

    #[tokio::test]
    async fn run_json_parses_stdout() {
        let value = executor()
            .run_json("echo '{\"a\":1}'", None)
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[tokio::test]
    async fn run_json_rejects_garbage() {
        let err = executor().run_json("echo not json", None).await.unwrap_err();
        assert!(matches!(err, Error::MalformedJsonResponse(_)));
    }

    #[tokio::test]
    async fn active_credentials_reach_subprocess() {
        let store = Arc::new(CredentialStore::new());
        store.set_active(Some("T1".into()), None);
        let executor = CommandExecutor::new(store);

        let output = executor
            .run("printenv RAILWAY_TOKEN", None)
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "T1");
    }

    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = executor().run("pwd", Some(dir.path())).await.unwrap();
        assert_eq!(
            std::fs::canonicalize(output.stdout.trim()).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }
}
