//! Metric instrument factories for conductor-rs.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"conductor-rs"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for conductor-rs instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("conductor-rs")
}

/// Counter: runs accepted by the dispatcher.
/// Labels: `trigger` ("task" | event type).
pub fn runs_submitted() -> Counter<u64> {
    meter()
        .u64_counter("conductor.runs.submitted")
        .with_description("Number of workflow runs submitted")
        .build()
}

/// Counter: runs that reached END or aborted.
/// Labels: `classification`, `termination` ("finalized" | "no_handler" | "aborted").
pub fn runs_finished() -> Counter<u64> {
    meter()
        .u64_counter("conductor.runs.finished")
        .with_description("Number of workflow runs that ended")
        .build()
}

/// Counter: node executions.
/// Labels: `node`.
pub fn node_executions() -> Counter<u64> {
    meter()
        .u64_counter("conductor.node.executions")
        .with_description("Number of node handler executions")
        .build()
}

/// Counter: memory-store writes issued by the provenance recorder.
/// Labels: `kind` ("node" | "relationship"), `result` ("ok" | "error").
pub fn store_writes() -> Counter<u64> {
    meter()
        .u64_counter("conductor.store.writes")
        .with_description("Number of memory store writes")
        .build()
}

/// Histogram: node duration in milliseconds.
/// Labels: `node`.
pub fn node_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("conductor.node.duration_ms")
        .with_description("Node handler duration in milliseconds")
        .with_unit("ms")
        .build()
}
