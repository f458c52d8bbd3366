//! Version-control port and the `git` subprocess implementation.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// The git operations the coding handler needs. Every failure is
/// `Error::VcsOperationFailed` carrying the tool's stderr.
#[async_trait]
pub trait Vcs: Send + Sync {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;
    async fn add(&self, dest: &Path, path: &str) -> Result<()>;
    async fn commit(&self, dest: &Path, message: &str) -> Result<()>;
    async fn push(&self, dest: &Path) -> Result<()>;
}

/// Runs the `git` binary. Prompts are disabled so a missing credential fails
/// instead of hanging; each call is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct GitCli {
    timeout: Duration,
    author_name: Option<String>,
    author_email: Option<String>,
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            author_name: None,
            author_email: None,
        }
    }

    /// Identity used for commits when the environment provides one.
    pub fn with_author(mut self, name: Option<String>, email: Option<String>) -> Self {
        self.author_name = name;
        self.author_email = email;
        self
    }

    fn command(&self, cwd: Option<&Path>) -> Command {
        let mut cmd = Command::new("git");
        cmd.env("GIT_TERMINAL_PROMPT", "0").kill_on_drop(true);
        if let Some(name) = &self.author_name {
            cmd.arg("-c").arg(format!("user.name={name}"));
        }
        if let Some(email) = &self.author_email {
            cmd.arg("-c").arg(format!("user.email={email}"));
        }
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    async fn run(&self, cwd: Option<&Path>, args: &[&str]) -> Result<()> {
        let mut cmd = self.command(cwd);
        cmd.args(args);
        debug!(args = ?args, "running git");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| Error::VcsOperationFailed {
                stderr: format!(
                    "git {} timed out after {}s",
                    args.first().copied().unwrap_or_default(),
                    self.timeout.as_secs()
                ),
            })?
            .map_err(|e| Error::VcsOperationFailed {
                stderr: format!("failed to run git: {e}"),
            })?;

        if output.status.success() {
            return Ok(());
        }
        // `git commit` with nothing staged explains itself on stdout.
        let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        if stderr.is_empty() {
            stderr = format!("git exited with {}", output.status);
        }
        warn!(args = ?args, status = %output.status, stderr = %stderr, "git failed");
        Err(Error::VcsOperationFailed { stderr })
    }
}

#[async_trait]
impl Vcs for GitCli {
    #[instrument(skip_all, fields(dest = %dest.display()))]
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.run(None, &["clone", url, &dest]).await
    }

    async fn add(&self, dest: &Path, path: &str) -> Result<()> {
        self.run(Some(dest), &["add", path]).await
    }

    async fn commit(&self, dest: &Path, message: &str) -> Result<()> {
        self.run(Some(dest), &["commit", "-m", message]).await
    }

    #[instrument(skip_all, fields(dest = %dest.display()))]
    async fn push(&self, dest: &Path) -> Result<()> {
        self.run(Some(dest), &["push"]).await
    }
}
