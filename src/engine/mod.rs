//! Workflow engine: graph, classification, node handlers, run driver.

pub mod classify;
pub mod control;
pub mod graph;
pub mod nodes;
pub mod ports;
pub mod workspace;

pub use control::{Dispatcher, Engine, RunHandle, RunReport, Termination};
pub use ports::{EngineConfig, Ports};
pub use workspace::Workspace;
