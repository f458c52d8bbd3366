//! Workflow span helpers.
//!
//! One `workflow.run` span per run, one `workflow.node` child span per node
//! execution. Routing decisions are recorded as events on the run span.

use tracing::Span;

use crate::engine::graph::{Next, Node};
use crate::model::{Classification, RunId, TaskId};

/// Start the span covering a whole run.
///
/// `workflow.task_id` and `workflow.classification` are declared empty and
/// filled in once intake and classification have completed.
pub fn start_run_span(run_id: &RunId) -> Span {
    tracing::info_span!(
        "workflow.run",
        "workflow.run_id" = %run_id,
        "workflow.task_id" = tracing::field::Empty,
        "workflow.classification" = tracing::field::Empty,
    )
}

/// Start a child span for a single node execution.
pub fn start_node_span(node: Node) -> Span {
    tracing::info_span!(
        "workflow.node",
        "workflow.node" = %node,
        "workflow.status" = tracing::field::Empty,
    )
}

pub fn record_task_id(span: &Span, task_id: TaskId) {
    span.record("workflow.task_id", task_id.0);
}

/// Record the classification and the edge the router picked.
pub fn record_route(span: &Span, classification: Classification, next: Next) {
    span.record("workflow.classification", tracing::field::display(classification));
    span.in_scope(|| {
        tracing::info!(classification = %classification, next = %next, "routed");
    });
}
