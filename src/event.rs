//! Structured events recorded by the engine during a run.
//!
//! Every run keeps its own transcript. Events are the engine's voice; the
//! work item's status message is the handlers' voice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::graph::Node;
use crate::model::{Classification, RunId, TaskId};

/// A structured event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic within a run. Consumers can detect gaps.
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    RunStarted {
        run_id: RunId,
    },
    NodeCompleted {
        node: Node,
        status: String,
        duration_ms: u64,
    },
    Routed {
        classification: Classification,
        to: Option<Node>,
    },
    RunFinished {
        task_id: Option<TaskId>,
        last_node: Node,
    },
    RunAborted {
        node: Node,
        error: String,
    },
}

/// Append-only event log for a single run.
#[derive(Debug, Default)]
pub struct Transcript {
    events: Vec<Event>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: EventKind) {
        let seq = self.events.len() as u64 + 1;
        self.events.push(Event {
            seq,
            timestamp: Utc::now(),
            kind,
        });
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic_from_one() {
        let mut transcript = Transcript::new();
        transcript.record(EventKind::RunStarted {
            run_id: RunId::new(),
        });
        transcript.record(EventKind::NodeCompleted {
            node: Node::Intake,
            status: "Task created: x".to_string(),
            duration_ms: 3,
        });
        transcript.record(EventKind::NodeCompleted {
            node: Node::Classify,
            status: "Classified as general".to_string(),
            duration_ms: 0,
        });

        let events = transcript.into_events();
        assert_eq!(events[0].seq, 1);
        for window in events.windows(2) {
            assert!(window[1].seq > window[0].seq);
        }
    }
}
