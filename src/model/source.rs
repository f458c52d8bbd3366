//! Source-control triggers.
//!
//! A [`SourceEvent`] wraps a GitHub webhook payload. Only the handful of
//! fields the workflow reads are modelled; the raw payload travels along as
//! opaque context for the ledger.

use serde::{Deserialize, Serialize};

const UNKNOWN_REPO: &str = "unknown/unknown";

/// GitHub webhook event kinds the workflow distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Push,
    PullRequest,
    Issues,
    /// Any other event name, kept verbatim.
    Other(String),
}

impl EventType {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "push" => EventType::Push,
            "pull_request" => EventType::PullRequest,
            "issues" => EventType::Issues,
            other => EventType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Push => "push",
            EventType::PullRequest => "pull_request",
            EventType::Issues => "issues",
            EventType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source-control trigger attached to a work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEvent {
    pub event_type: EventType,
    /// Clone URL of the repository.
    pub repo_url: Option<String>,
    /// Full `owner/name` of the repository.
    pub repo_name: Option<String>,
    /// Filled in by intake.
    pub head_commit_id: Option<String>,
    /// Filled in by intake.
    pub changed_files: Vec<String>,
    pub raw_payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Payload subset
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Payload {
    action: Option<String>,
    number: Option<u64>,
    repository: Option<Repository>,
    head_commit: Option<HeadCommit>,
    pull_request: Option<PullRequest>,
    issue: Option<Issue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Repository {
    full_name: Option<String>,
    clone_url: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HeadCommit {
    id: Option<String>,
    message: Option<String>,
    added: Vec<String>,
    modified: Vec<String>,
    removed: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequest {
    title: Option<String>,
    head: Option<PullRequestHead>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestHead {
    sha: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Issue {
    title: Option<String>,
    body: Option<String>,
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

impl SourceEvent {
    /// Build a trigger from a GitHub event name and its webhook payload.
    ///
    /// Repository name and clone URL are read from `payload.repository`.
    pub fn github(event_type: &str, payload: serde_json::Value) -> Self {
        let repository = parse(&payload).repository.unwrap_or_default();
        Self {
            event_type: EventType::parse(event_type),
            repo_url: repository.clone_url.or(repository.html_url),
            repo_name: repository.full_name,
            head_commit_id: None,
            changed_files: Vec::new(),
            raw_payload: payload,
        }
    }

    /// Override the repository URL (e.g. a mirror or an authenticated remote).
    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    /// `owner/name`, or a placeholder when the payload carries none.
    pub fn repo_name_or_unknown(&self) -> &str {
        self.repo_name.as_deref().unwrap_or(UNKNOWN_REPO)
    }

    /// Task description derived from the event.
    pub fn describe(&self) -> String {
        let payload = parse(&self.raw_payload);
        let repo = self.repo_name_or_unknown();

        match &self.event_type {
            EventType::Push => {
                let message = payload
                    .head_commit
                    .and_then(|commit| commit.message)
                    .unwrap_or_else(|| format!("New push to {repo}"));
                format!("Analyze recent push to {repo}: {message}")
            }
            EventType::PullRequest => {
                let action = payload.action.unwrap_or_else(|| "activity".to_string());
                let title = payload
                    .pull_request
                    .and_then(|pr| pr.title)
                    .unwrap_or_else(|| format!("Pull request activity in {repo}"));
                format!("Process pull request '{title}' ({action}) in {repo}")
            }
            EventType::Issues if payload.action.as_deref() == Some("opened") => {
                let issue = payload.issue.unwrap_or_default();
                let title = issue.title.unwrap_or_else(|| "New issue".to_string());
                let body = issue.body.unwrap_or_default();
                format!("Task from new issue '{title}': {body}")
            }
            other => format!("Handle GitHub event '{other}' for {repo}"),
        }
    }

    /// Paths touched by the event, deduplicated in first-seen order.
    ///
    /// Pull requests get a single placeholder entry; their file list needs a
    /// separate API call that is not made here.
    pub fn derive_changed_files(&self) -> Vec<String> {
        let payload = parse(&self.raw_payload);

        match self.event_type {
            EventType::Push => {
                let commit = payload.head_commit.unwrap_or_default();
                let mut seen = std::collections::HashSet::new();
                commit
                    .added
                    .into_iter()
                    .chain(commit.modified)
                    .chain(commit.removed)
                    .filter(|path| seen.insert(path.clone()))
                    .collect()
            }
            EventType::PullRequest => {
                let number = payload
                    .number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string());
                vec![format!("Pull Request #{number} changed files")]
            }
            _ => Vec::new(),
        }
    }

    /// Commit the event points at: the pushed head, or the PR head SHA.
    pub fn derive_head_commit_id(&self) -> Option<String> {
        let payload = parse(&self.raw_payload);

        match self.event_type {
            EventType::Push => payload.head_commit.and_then(|commit| commit.id),
            EventType::PullRequest => payload
                .pull_request
                .and_then(|pr| pr.head)
                .and_then(|head| head.sha),
            _ => None,
        }
    }

    /// Opaque context handed to the task ledger.
    pub fn ledger_context(&self) -> serde_json::Value {
        serde_json::json!({
            "event_type": self.event_type.as_str(),
            "repo_name": self.repo_name,
            "repo_url": self.repo_url,
            "payload": self.raw_payload,
        })
    }
}

/// Malformed payloads degrade to an empty view; every derivation has a fallback.
fn parse(payload: &serde_json::Value) -> Payload {
    serde_json::from_value(payload.clone()).unwrap_or_default()
}
