use tracing::info;

use crate::engine::ports::Ports;
use crate::error::Result;
use crate::model::{TaskId, WorkItem};

/// Register the task with the ledger.
///
/// For source-control triggers the description, changed files and head
/// commit are derived from the event first, and the event is passed to the
/// ledger as context. Ledger failure aborts the run.
pub async fn intake(mut item: WorkItem, ports: &Ports) -> Result<WorkItem> {
    let (context, prefix) = match item.source_event.as_mut() {
        Some(event) => {
            item.description = event.describe();
            event.changed_files = event.derive_changed_files();
            event.head_commit_id = event.derive_head_commit_id();
            (event.ledger_context(), "Task created from GitHub event")
        }
        None => (serde_json::json!({}), "Task created"),
    };

    let task = ports.ledger.create_task(&item.description, context).await?;
    let mut item = item.assign_task_id(TaskId(task.id))?;
    item.status_message = format!("{prefix}: {}", item.description);

    info!(
        task_id = task.id,
        repo = item
            .source_event
            .as_ref()
            .and_then(|event| event.repo_url.as_deref())
            .unwrap_or("-"),
        "task created"
    );
    Ok(item)
}
