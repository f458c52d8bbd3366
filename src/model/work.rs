//! The work item: identity, classification, and accumulated outputs of one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::source::SourceEvent;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Newtype for run IDs. One per submitted trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier assigned by the task ledger. Never zero once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Which handler branch a work item takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Coding,
    Docs,
    General,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Classification::Coding => "coding",
            Classification::Docs => "docs",
            Classification::General => "general",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Work Item
// ---------------------------------------------------------------------------

/// The state record of one workflow run.
///
/// Owned by exactly one run. Handlers take it by value and hand back the
/// updated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub run_id: RunId,

    /// Set by intake; unset before.
    task_id: Option<TaskId>,

    /// What is being asked for. Intake rewrites it for source-control triggers.
    pub description: String,

    /// Set once by the classification step.
    classification: Option<Classification>,

    /// Latest progress line. Every completed handler overwrites it.
    pub status_message: String,

    /// Appended only by the code-execution handler.
    pub code_changes: Vec<String>,

    /// Written only by the docs handler.
    pub documentation: Option<String>,

    /// Written only by the checklist handler.
    pub checklist: Option<String>,

    pub source_event: Option<SourceEvent>,

    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    pub fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    /// The task id, or an invariant error naming the step that needed it.
    pub fn require_task_id(&self, step: &str) -> Result<TaskId> {
        self.task_id
            .ok_or_else(|| Error::Invariant(format!("task id unset before {step}")))
    }

    /// Record the ledger-assigned id. Zero is rejected.
    pub(crate) fn assign_task_id(mut self, id: TaskId) -> Result<Self> {
        if id.0 == 0 {
            return Err(Error::LedgerUnavailable(
                "ledger assigned invalid task id 0".to_string(),
            ));
        }
        if let Some(existing) = self.task_id {
            return Err(Error::Invariant(format!(
                "task id already assigned ({existing})"
            )));
        }
        self.task_id = Some(id);
        Ok(self)
    }

    /// Fix the classification. It can be set exactly once.
    pub(crate) fn classify(mut self, classification: Classification) -> Result<Self> {
        if let Some(existing) = self.classification {
            return Err(Error::Invariant(format!(
                "classification already set to {existing}"
            )));
        }
        self.classification = Some(classification);
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a fresh work item. The engine's public API for submitting work.
#[derive(Debug, Clone)]
pub struct NewWorkItem {
    pub(crate) description: String,
    pub(crate) source_event: Option<SourceEvent>,
}

impl NewWorkItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            source_event: None,
        }
    }

    pub fn source_event(mut self, event: SourceEvent) -> Self {
        self.source_event = Some(event);
        self
    }

    /// Materialize the initial state: only description and source event set.
    pub fn build(self) -> WorkItem {
        WorkItem {
            run_id: RunId::new(),
            task_id: None,
            description: self.description,
            classification: None,
            status_message: "Run submitted".to_string(),
            code_changes: Vec::new(),
            documentation: None,
            checklist: None,
            source_event: self.source_event,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_item_has_only_description() {
        let item = NewWorkItem::new("Fix the login bug").build();
        assert_eq!(item.description, "Fix the login bug");
        assert!(item.task_id().is_none());
        assert!(item.classification().is_none());
        assert!(item.code_changes.is_empty());
        assert!(item.documentation.is_none());
        assert!(item.checklist.is_none());
    }

    #[test]
    fn classification_is_set_once() {
        let item = NewWorkItem::new("x").build();
        let item = item.classify(Classification::Docs).unwrap();
        assert_eq!(item.classification(), Some(Classification::Docs));

        let err = item.classify(Classification::Coding).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }

    #[test]
    fn zero_task_id_is_rejected() {
        let item = NewWorkItem::new("x").build();
        let err = item.assign_task_id(TaskId(0)).unwrap_err();
        assert!(matches!(err, Error::LedgerUnavailable(_)));
    }

    #[test]
    fn require_task_id_names_the_step() {
        let item = NewWorkItem::new("x").build();
        let err = item.require_task_id("finalize").unwrap_err();
        assert!(err.to_string().contains("finalize"));

        let item = item.assign_task_id(TaskId(7)).unwrap();
        assert_eq!(item.require_task_id("finalize").unwrap(), TaskId(7));
    }

    #[test]
    fn run_id_display_is_short() {
        assert_eq!(RunId::new().to_string().len(), 8);
    }
}
