//! Run driver and job submission.
//!
//! [`Engine`] walks one work item through the graph. [`Dispatcher`] spawns
//! each run as its own tokio task and hands back a [`RunHandle`].

use crate::engine::graph::{self, Next, Node};
use crate::engine::nodes;
use crate::engine::ports::{EngineConfig, Ports};
use crate::error::{Error, Result};
use crate::event::{Event, EventKind, Transcript};
use crate::model::{NewWorkItem, RunId, TaskId, WorkItem};
use crate::telemetry::metrics;
use crate::telemetry::work::{record_route, record_task_id, start_node_span, start_run_span};
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, error, info};

/// How a run reached END.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The terminal sequence ran through finalize.
    Finalized,
    /// Classified as general: no handler, nothing recorded.
    NoHandler,
}

impl Termination {
    fn as_str(self) -> &'static str {
        match self {
            Termination::Finalized => "finalized",
            Termination::NoHandler => "no_handler",
        }
    }
}

/// Final state of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    pub item: WorkItem,
    pub events: Vec<Event>,
    pub termination: Termination,
}

impl RunReport {
    /// Nodes that completed, in execution order.
    pub fn completed_nodes(&self) -> Vec<Node> {
        self.events
            .iter()
            .filter_map(|event| match event.kind {
                EventKind::NodeCompleted { node, .. } => Some(node),
                _ => None,
            })
            .collect()
    }
}

/// Drives runs along the static graph. Stateless between runs.
pub struct Engine {
    ports: Ports,
    config: EngineConfig,
}

impl Engine {
    pub fn new(ports: Ports, config: EngineConfig) -> Self {
        Self { ports, config }
    }

    /// Run `item` to END.
    ///
    /// Returns `Err` only when a fatal error aborts the run (ledger failure
    /// at intake, or a broken invariant).
    pub async fn run(&self, item: WorkItem) -> Result<RunReport> {
        self.run_observed(item, None).await
    }

    async fn run_observed(
        &self,
        item: WorkItem,
        task_id_tx: Option<watch::Sender<Option<TaskId>>>,
    ) -> Result<RunReport> {
        let span = start_run_span(&item.run_id);
        self.drive(item, task_id_tx, &span)
            .instrument(span.clone())
            .await
    }

    async fn drive(
        &self,
        mut item: WorkItem,
        task_id_tx: Option<watch::Sender<Option<TaskId>>>,
        run_span: &Span,
    ) -> Result<RunReport> {
        let run_id = item.run_id;
        let mut transcript = Transcript::new();
        transcript.record(EventKind::RunStarted { run_id });
        info!(run_id = %run_id, "run started");

        let mut node = graph::START;
        loop {
            let node_span = start_node_span(node);
            let started = Instant::now();

            let result = match node {
                Node::Intake => Ok(()),
                _ => item.require_task_id(node.as_str()).map(|_| ()),
            };
            let result = match result {
                Ok(()) => self.execute(node, item).instrument(node_span.clone()).await,
                Err(e) => Err(e),
            };

            let elapsed = started.elapsed();
            let node_label = [KeyValue::new("node", node.as_str())];
            metrics::node_executions().add(1, &node_label);
            metrics::node_duration_ms().record(elapsed.as_secs_f64() * 1000.0, &node_label);

            item = match result {
                Ok(item) => item,
                Err(e) => {
                    error!(node = %node, severity = %e.severity(), error = %e, "run aborted");
                    transcript.record(EventKind::RunAborted {
                        node,
                        error: e.to_string(),
                    });
                    metrics::runs_finished().add(1, &[KeyValue::new("termination", "aborted")]);
                    return Err(e);
                }
            };

            node_span.record("workflow.status", item.status_message.as_str());
            transcript.record(EventKind::NodeCompleted {
                node,
                status: item.status_message.clone(),
                duration_ms: elapsed.as_millis() as u64,
            });

            if node == Node::Intake {
                if let Some(task_id) = item.task_id() {
                    record_task_id(run_span, task_id);
                    if let Some(tx) = &task_id_tx {
                        tx.send_replace(Some(task_id));
                    }
                }
            }

            let next = match graph::successor(node, &item) {
                Ok(next) => next,
                Err(e) => {
                    error!(node = %node, error = %e, "run aborted");
                    transcript.record(EventKind::RunAborted {
                        node,
                        error: e.to_string(),
                    });
                    metrics::runs_finished().add(1, &[KeyValue::new("termination", "aborted")]);
                    return Err(e);
                }
            };

            if node == Node::Classify {
                if let Some(classification) = item.classification() {
                    record_route(run_span, classification, next);
                    transcript.record(EventKind::Routed {
                        classification,
                        to: match next {
                            Next::Node(to) => Some(to),
                            Next::End => None,
                        },
                    });
                }
            }

            match next {
                Next::Node(to) => node = to,
                Next::End => {
                    let termination = if node == Node::Finalize {
                        Termination::Finalized
                    } else {
                        Termination::NoHandler
                    };
                    transcript.record(EventKind::RunFinished {
                        task_id: item.task_id(),
                        last_node: node,
                    });
                    metrics::runs_finished().add(
                        1,
                        &[
                            KeyValue::new(
                                "classification",
                                item.classification()
                                    .map(|c| c.to_string())
                                    .unwrap_or_default(),
                            ),
                            KeyValue::new("termination", termination.as_str()),
                        ],
                    );
                    info!(
                        run_id = %run_id,
                        last_node = %node,
                        status = %item.status_message,
                        "run finished"
                    );
                    return Ok(RunReport {
                        run_id,
                        item,
                        events: transcript.into_events(),
                        termination,
                    });
                }
            }
        }
    }

    async fn execute(&self, node: Node, item: WorkItem) -> Result<WorkItem> {
        match node {
            Node::Intake => nodes::intake(item, &self.ports).await,
            Node::Classify => nodes::classify(item),
            Node::CodeExecution => nodes::code_execution(item, &self.ports, &self.config).await,
            Node::Docs => nodes::docs(item, &self.ports).await,
            Node::RecordProvenance => nodes::record_provenance(item, &self.ports).await,
            Node::Checklist => nodes::checklist(item, &self.ports).await,
            Node::Finalize => nodes::finalize(item, &self.ports).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Accepts work and runs each item on its own task.
#[derive(Clone)]
pub struct Dispatcher {
    engine: Arc<Engine>,
    active_runs: Arc<AtomicUsize>,
}

/// Decrements the active-run count when the run task ends, panics included.
struct ActiveRun(Arc<AtomicUsize>);

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Dispatcher {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
            active_runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runs spawned and not yet ended.
    pub fn active_runs(&self) -> usize {
        self.active_runs.load(Ordering::SeqCst)
    }

    /// Accept a run. Must be called within a tokio runtime.
    pub fn submit(&self, work: NewWorkItem) -> RunHandle {
        let item = work.build();
        let run_id = item.run_id;
        let trigger = item
            .source_event
            .as_ref()
            .map(|event| event.event_type.to_string())
            .unwrap_or_else(|| "task".to_string());
        metrics::runs_submitted().add(1, &[KeyValue::new("trigger", trigger.clone())]);

        let (tx, rx) = watch::channel(None);
        let engine = Arc::clone(&self.engine);
        self.active_runs.fetch_add(1, Ordering::SeqCst);
        let guard = ActiveRun(Arc::clone(&self.active_runs));

        let join = tokio::spawn(async move {
            let _guard = guard;
            engine.run_observed(item, Some(tx)).await
        });

        info!(run_id = %run_id, trigger = %trigger, "run accepted");
        RunHandle {
            run_id,
            task_id: rx,
            join,
        }
    }
}

/// Handle to a submitted run.
pub struct RunHandle {
    run_id: RunId,
    task_id: watch::Receiver<Option<TaskId>>,
    join: JoinHandle<Result<RunReport>>,
}

impl RunHandle {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The ledger task id, once intake has completed.
    pub fn task_id(&self) -> Option<TaskId> {
        *self.task_id.borrow()
    }

    /// Wait for intake. `None` if the run ended without a task id.
    pub async fn task_id_assigned(&mut self) -> Option<TaskId> {
        self.task_id
            .wait_for(|id| id.is_some())
            .await
            .ok()
            .and_then(|id| *id)
    }

    /// Wait for the run to end.
    pub async fn wait(self) -> Result<RunReport> {
        self.join
            .await
            .map_err(|e| Error::Other(format!("run task failed: {e}")))?
    }
}
