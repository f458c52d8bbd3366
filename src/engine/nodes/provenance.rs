use opentelemetry::KeyValue;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::engine::ports::Ports;
use crate::error::Result;
use crate::memory::{MemoryStore, Properties, props};
use crate::model::{Classification, TaskId, WorkItem};
use crate::telemetry::metrics;

const PREVIEW_CHARS: usize = 100;

/// Issues independent store writes, counting the ones that fail.
struct Recorder<'a> {
    store: &'a dyn MemoryStore,
    task_id: TaskId,
    failures: usize,
}

impl Recorder<'_> {
    async fn node(&mut self, label: &str, properties: Properties) {
        let result = self.store.add_node(label, properties).await;
        self.tally("node", label, result);
    }

    async fn link_from_task(&mut self, end_label: &str, end_key: Properties, rel_type: &str) {
        let task_key = props([("id", json!(self.task_id.0))]);
        let result = self
            .store
            .add_relationship("Task", task_key, end_label, end_key, rel_type)
            .await;
        self.tally("relationship", rel_type, result);
    }

    fn tally(&mut self, kind: &'static str, name: &str, result: Result<()>) {
        let outcome = match result {
            Ok(()) => {
                debug!(task_id = %self.task_id, kind, name, "stored");
                "ok"
            }
            Err(e) => {
                warn!(task_id = %self.task_id, kind, name, error = %e, "memory store write failed");
                self.failures += 1;
                "error"
            }
        };
        metrics::store_writes().add(
            1,
            &[KeyValue::new("kind", kind), KeyValue::new("result", outcome)],
        );
    }
}

/// `owner/name` split into owner and short name; a bare name is both.
fn split_repo_name(full_name: &str) -> (&str, &str) {
    match full_name.split_once('/') {
        Some((owner, name)) => (owner, name),
        None => (full_name, full_name),
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Record the task and what it touched in the memory store.
///
/// Best-effort: each write is independent and a failed write never aborts
/// the remaining ones or the run.
pub async fn record_provenance(mut item: WorkItem, ports: &Ports) -> Result<WorkItem> {
    let task_id = item.require_task_id("provenance recording")?;
    let mut recorder = Recorder {
        store: ports.store.as_ref(),
        task_id,
        failures: 0,
    };

    recorder
        .node(
            "Task",
            props([
                ("id", json!(task_id.0)),
                ("description", json!(item.description)),
                ("status", json!(item.status_message)),
            ]),
        )
        .await;

    if let Some(event) = &item.source_event {
        let repo_url = event.repo_url.clone().map_or(Value::Null, Value::String);
        let full_name = event.repo_name_or_unknown();
        let (owner, short_name) = split_repo_name(full_name);

        recorder
            .node(
                "Repository",
                props([
                    ("name", json!(full_name)),
                    ("url", repo_url.clone()),
                    ("owner", json!(owner)),
                    ("short_name", json!(short_name)),
                ]),
            )
            .await;
        let repo_key = match &event.repo_url {
            Some(url) => props([("url", json!(url))]),
            None => props([("name", json!(full_name))]),
        };
        recorder
            .link_from_task("Repository", repo_key, "RELATED_TO_REPO")
            .await;

        if let Some(sha) = &event.head_commit_id {
            recorder
                .node(
                    "Commit",
                    props([
                        ("sha", json!(sha)),
                        ("repo_url", repo_url.clone()),
                        ("event_type", json!(event.event_type.as_str())),
                    ]),
                )
                .await;
            recorder
                .link_from_task("Commit", props([("sha", json!(sha))]), "TRIGGERED_BY_COMMIT")
                .await;
        }

        for path in &event.changed_files {
            recorder
                .node(
                    "File",
                    props([("path", json!(path)), ("repo_url", repo_url.clone())]),
                )
                .await;
            recorder
                .link_from_task("File", props([("path", json!(path))]), "AFFECTS_FILE")
                .await;
        }
    }

    match item.classification() {
        Some(Classification::Coding) => {
            for change in &item.code_changes {
                recorder
                    .node(
                        "GeneratedFile",
                        props([("path", json!(change)), ("task_id", json!(task_id.0))]),
                    )
                    .await;
                recorder
                    .link_from_task(
                        "GeneratedFile",
                        props([("path", json!(change))]),
                        "GENERATED_CODE",
                    )
                    .await;
            }
        }
        Some(Classification::Docs) => {
            if let Some(documentation) = &item.documentation {
                let content_preview = preview(documentation);
                recorder
                    .node(
                        "DocumentationOutput",
                        props([
                            ("content_preview", json!(content_preview)),
                            ("task_id", json!(task_id.0)),
                        ]),
                    )
                    .await;
                recorder
                    .link_from_task(
                        "DocumentationOutput",
                        props([
                            ("content_preview", json!(content_preview)),
                            ("task_id", json!(task_id.0)),
                        ]),
                        "GENERATED_DOCS",
                    )
                    .await;
            }
        }
        Some(Classification::General) | None => {}
    }

    let failures = recorder.failures;
    info!(task_id = %task_id, failures, "provenance recorded");
    item.status_message = if failures == 0 {
        "Context stored in memory store".to_string()
    } else {
        format!("Context stored in memory store with {failures} failed write(s)")
    };
    Ok(item)
}
