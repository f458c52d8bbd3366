//! Error types for conductor-rs.
//!
//! The variants mirror the failure kinds of the external ports. How a kind is
//! treated by the engine is given by [`Error::severity`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("task ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("memory store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("code generation failed: {0}")]
    GenerationFailed(String),

    #[error("git operation failed: {stderr}")]
    VcsOperationFailed { stderr: String },

    #[error("notification failed: {0}")]
    NotificationFailed(String),

    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// How the engine reacts to an error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Aborts the run.
    Fatal,
    /// Captured into the work item's status; the run continues.
    Recoverable,
    /// Logged and dropped.
    NonFatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Fatal => "fatal",
            Severity::Recoverable => "recoverable",
            Severity::NonFatal => "non_fatal",
        };
        write!(f, "{s}")
    }
}

impl Error {
    pub fn severity(&self) -> Severity {
        match self {
            Error::LedgerUnavailable(_)
            | Error::InvalidTransition { .. }
            | Error::Invariant(_)
            | Error::Config(_) => Severity::Fatal,
            Error::GenerationFailed(_)
            | Error::VcsOperationFailed { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::Other(_) => Severity::Recoverable,
            Error::StoreUnavailable(_) | Error::NotificationFailed(_) => Severity::NonFatal,
        }
    }

    /// Human-readable status line for a failure captured into a work item.
    pub fn status_message(&self) -> String {
        match self {
            Error::VcsOperationFailed { stderr } => {
                format!("Error during Git operation: {}", stderr.trim())
            }
            Error::GenerationFailed(reason) => format!("Error during code generation: {reason}"),
            other => format!("An unexpected error occurred: {other}"),
        }
    }
}
