//! Core data model.
//!
//! A work item is the state record threaded through one workflow run. A
//! source event is the optional source-control trigger it was created from.

pub mod source;
pub mod work;

pub use source::{EventType, SourceEvent};
pub use work::{Classification, NewWorkItem, RunId, TaskId, WorkItem};
