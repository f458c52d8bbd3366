//! Ledger client for the task endpoints of the tool server.

use async_trait::async_trait;
use tracing::debug;

use super::{Task, TaskLedger, TaskStatus};
use crate::error::{Error, Result};
use crate::http::error_for_status;
use crate::model::TaskId;

/// `POST {base}/tasks/` and `PUT {base}/tasks/{id}`.
pub struct HttpLedger {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLedger {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

fn unavailable(e: impl std::fmt::Display) -> Error {
    Error::LedgerUnavailable(e.to_string())
}

#[async_trait]
impl TaskLedger for HttpLedger {
    async fn create_task(&self, description: &str, context: serde_json::Value) -> Result<Task> {
        let response = self
            .client
            .post(format!("{}/tasks/", self.base_url))
            .query(&[("task_description", description)])
            .json(&serde_json::json!({ "context": context }))
            .send()
            .await
            .map_err(unavailable)?;
        let task: Task = error_for_status(response)
            .await
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;
        debug!(task_id = task.id, "ledger task created");
        Ok(task)
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task> {
        let response = self
            .client
            .put(format!("{}/tasks/{id}", self.base_url))
            .query(&[("status", status.as_str())])
            .send()
            .await
            .map_err(unavailable)?;
        let task: Task = error_for_status(response)
            .await
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;
        debug!(task_id = task.id, status = %task.status, "ledger task updated");
        Ok(task)
    }
}
