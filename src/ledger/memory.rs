//! List-backed ledger for local runs and tests.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{Task, TaskLedger, TaskStatus};
use crate::error::{Error, Result};
use crate::model::TaskId;

struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
}

/// In-process ledger. Ids start at 1 and increase by one per task.
pub struct InMemoryLedger {
    inner: Mutex<Inner>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::LedgerUnavailable("ledger lock poisoned".to_string()))
    }

    pub fn get(&self, id: TaskId) -> Result<Task> {
        self.lock()?
            .tasks
            .iter()
            .find(|task| task.id == id.0)
            .cloned()
            .ok_or_else(|| Error::Other(format!("task with id {id} not found")))
    }

    pub fn list(&self) -> Result<Vec<Task>> {
        Ok(self.lock()?.tasks.clone())
    }
}

#[async_trait]
impl TaskLedger for InMemoryLedger {
    async fn create_task(&self, description: &str, context: serde_json::Value) -> Result<Task> {
        let mut inner = self.lock()?;
        let task = Task {
            id: inner.next_id,
            description: description.to_string(),
            status: TaskStatus::Pending.to_string(),
            context,
        };
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task> {
        let mut inner = self.lock()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|task| task.id == id.0)
            .ok_or_else(|| Error::LedgerUnavailable(format!("task with id {id} not found")))?;
        task.status = status.to_string();
        Ok(task.clone())
    }
}
