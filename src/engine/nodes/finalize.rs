use tracing::{error, info, warn};

use crate::engine::ports::Ports;
use crate::error::Result;
use crate::ledger::TaskStatus;
use crate::model::WorkItem;

/// Mark the task completed, then notify.
///
/// Terminal: a ledger failure is logged and recorded in the status, but the
/// run still counts as complete.
pub async fn finalize(mut item: WorkItem, ports: &Ports) -> Result<WorkItem> {
    let task_id = item.require_task_id("finalize")?;

    match ports.ledger.update_status(task_id, TaskStatus::Completed).await {
        Ok(_) => {
            info!(task_id = %task_id, "task completed");
            item.status_message = "Task status updated to completed".to_string();
        }
        Err(e) => {
            error!(task_id = %task_id, error = %e, "could not mark task completed");
            item.status_message = format!("Failed to mark task completed: {e}");
        }
    }

    if let Some(notifier) = &ports.notifier {
        let title = format!("Task {task_id} finished");
        let mut message = item.description.clone();
        for change in &item.code_changes {
            message.push_str(&format!("\n- {change}"));
        }
        message.push_str(&format!("\n\n{}", item.status_message));
        if let Err(e) = notifier.notify(&title, &message).await {
            warn!(task_id = %task_id, error = %e, "completion notification failed");
        }
    }

    Ok(item)
}
