//! Task ledger port.
//!
//! The ledger hands out task ids and tracks task status. The engine creates
//! one task at intake and marks it completed at finalize.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::TaskId;

/// Status values the ledger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task as the ledger reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub context: serde_json::Value,
}

fn default_status() -> String {
    TaskStatus::Pending.to_string()
}

impl Task {
    pub fn task_id(&self) -> TaskId {
        TaskId(self.id)
    }
}

/// Where tasks are registered. Failures surface as `Error::LedgerUnavailable`.
#[async_trait]
pub trait TaskLedger: Send + Sync {
    async fn create_task(&self, description: &str, context: serde_json::Value) -> Result<Task>;
    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task>;
}
