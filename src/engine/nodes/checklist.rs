use tracing::warn;

use crate::checklist::render_checklist;
use crate::engine::ports::Ports;
use crate::error::Result;
use crate::model::WorkItem;

/// Produce the demo checklist, rendering it locally if the generator fails.
pub async fn checklist(mut item: WorkItem, ports: &Ports) -> Result<WorkItem> {
    let text = match ports
        .checklists
        .checklist(&item.description, &item.code_changes)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "checklist generator failed, rendering locally");
            render_checklist(&item.description, &item.code_changes)
        }
    };
    item.checklist = Some(text);
    item.status_message = "Demo checklist generated".to_string();
    Ok(item)
}
