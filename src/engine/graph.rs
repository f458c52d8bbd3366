//! Static workflow graph.
//!
//! ```text
//! intake -> classify -> coding ----\
//!                    -> docs ------+-> record_provenance -> checklist -> finalize -> END
//!                    -> general -> END
//! ```
//!
//! Only the edge out of `classify` is conditional; every other edge is fixed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Classification, WorkItem};

/// A node in the workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Intake,
    Classify,
    CodeExecution,
    Docs,
    RecordProvenance,
    Checklist,
    Finalize,
}

impl Node {
    pub fn as_str(self) -> &'static str {
        match self {
            Node::Intake => "intake",
            Node::Classify => "classify",
            Node::CodeExecution => "code_execution",
            Node::Docs => "docs",
            Node::RecordProvenance => "record_provenance",
            Node::Checklist => "checklist",
            Node::Finalize => "finalize",
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the engine goes after a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Node(Node),
    End,
}

impl std::fmt::Display for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Next::Node(node) => write!(f, "{node}"),
            Next::End => write!(f, "END"),
        }
    }
}

/// The entry node of every run.
pub const START: Node = Node::Intake;

/// The conditional edge out of classification.
pub fn route(classification: Classification) -> Next {
    match classification {
        Classification::Coding => Next::Node(Node::CodeExecution),
        Classification::Docs => Next::Node(Node::Docs),
        Classification::General => Next::End,
    }
}

/// The edge taken after `node` completed with `item` as its output.
pub fn successor(node: Node, item: &WorkItem) -> Result<Next> {
    let next = match node {
        Node::Intake => Next::Node(Node::Classify),
        Node::Classify => {
            let classification = item.classification().ok_or_else(|| Error::InvalidTransition {
                from: node.to_string(),
                to: "unclassified".to_string(),
            })?;
            route(classification)
        }
        Node::CodeExecution | Node::Docs => Next::Node(Node::RecordProvenance),
        Node::RecordProvenance => Next::Node(Node::Checklist),
        Node::Checklist => Next::Node(Node::Finalize),
        Node::Finalize => Next::End,
    };
    Ok(next)
}
