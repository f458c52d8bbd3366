//! Typed configuration from environment variables.
//!
//! Loads once at startup. Nothing is strictly required: every collaborator
//! has a local default or degrades when unconfigured. Malformed values fail
//! fast. Sensitive values wrapped in secrecy::SecretString to prevent log leaks.

pub mod secrets;

use crate::error::{Error, Result};
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_TARGET_FILE: &str = "fibonacci.py";
pub const DEFAULT_GENERATION_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug)]
pub struct Config {
    /// Base URL of the server hosting the task ledger, memory and checklist tools.
    pub mcp_server_url: String,
    /// Repository cloned by the coding handler when the trigger carries none.
    pub default_repo_url: Option<String>,
    /// Parent directory of the per-task scratch workspaces.
    pub workspace_root: PathBuf,
    /// File the coding handler generates, relative to the workspace.
    pub target_file: String,
    pub anthropic_api_key: Option<SecretString>,
    pub generation_model: String,
    pub teams_webhook_url: Option<SecretString>,
    pub http_timeout: Duration,
    pub git_timeout: Duration,
    pub git_author_name: Option<String>,
    pub git_author_email: Option<String>,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| is_configured(v));

        Ok(Self {
            mcp_server_url: var("MCP_SERVER_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            default_repo_url: var("DEFAULT_REPO_URL"),
            workspace_root: var("WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("mcp_workspace")),
            target_file: var("CODE_TARGET_FILE").unwrap_or_else(|| DEFAULT_TARGET_FILE.to_string()),
            anthropic_api_key: var("ANTHROPIC_API_KEY").map(SecretString::from),
            generation_model: var("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            teams_webhook_url: var("TEAMS_WEBHOOK_URL").map(SecretString::from),
            http_timeout: seconds_var(&var, "HTTP_TIMEOUT_SECS", 30)?,
            git_timeout: seconds_var(&var, "GIT_TIMEOUT_SECS", 300)?,
            git_author_name: var("GIT_AUTHOR_NAME"),
            git_author_email: var("GIT_AUTHOR_EMAIL"),
            otel_endpoint: var("OTEL_ENDPOINT"),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Empty values and template placeholders such as `YOUR_API_KEY` count as unset.
fn is_configured(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.starts_with("YOUR_")
}

fn seconds_var(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<Duration> {
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| Error::Config(format!("{name} must be a whole number of seconds, got {raw:?}"))),
        None => Ok(Duration::from_secs(default)),
    }
}
