//! Node handlers.
//!
//! Each handler takes the work item by value and returns the updated item.
//! An `Err` means the run must abort; recoverable failures are written into
//! `status_message` instead.

mod checklist;
mod coding;
mod docs;
mod finalize;
mod intake;
mod provenance;

pub use checklist::checklist;
pub use coding::{code_execution, commit_message};
pub use docs::{docs, docs_prompt};
pub use finalize::finalize;
pub use intake::intake;
pub use provenance::record_provenance;

use crate::engine::classify::classify as classify_description;
use crate::error::Result;
use crate::model::WorkItem;

/// Classification step. Pure; sets the classification exactly once.
pub fn classify(item: WorkItem) -> Result<WorkItem> {
    let event_type = item.source_event.as_ref().map(|event| &event.event_type);
    let classification = classify_description(&item.description, event_type);
    let mut item = item.classify(classification)?;
    item.status_message = format!("Classified as {classification}");
    Ok(item)
}
