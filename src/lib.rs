//! # conductor-rs
//!
//! Workflow engine that routes tasks and source-control events to a coding,
//! documentation or no-op handler, records provenance in a graph memory
//! store, and reports completion to a task ledger.
//!
//! External collaborators (ledger, memory store, generation, git, chat
//! notifications) sit behind async traits; HTTP and in-process
//! implementations are provided. Observability is tracing + OpenTelemetry.

pub mod checklist;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod http;
pub mod ledger;
pub mod llm;
pub mod memory;
pub mod model;
pub mod notify;
pub mod telemetry;
pub mod vcs;
