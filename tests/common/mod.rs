//! Shared fakes and wiring for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use conductor_rs::checklist::{ChecklistGenerator, TemplateChecklist};
use conductor_rs::engine::{Engine, EngineConfig, Ports};
use conductor_rs::error::{Error, Result};
use conductor_rs::ledger::memory::InMemoryLedger;
use conductor_rs::ledger::{Task, TaskLedger, TaskStatus};
use conductor_rs::llm::CodeGenerator;
use conductor_rs::llm::placeholder::PlaceholderWriter;
use conductor_rs::memory::graph::InMemoryGraph;
use conductor_rs::memory::{MemoryStore, Properties};
use conductor_rs::model::TaskId;
use conductor_rs::notify::Notifier;
use conductor_rs::vcs::Vcs;

pub const REPO_URL: &str = "https://example.com/acme/demo.git";
pub const FIB_SOURCE: &str = "def fib(n):\n    return n if n < 2 else fib(n - 1) + fib(n - 2)\n";

// ---------------------------------------------------------------------------
// Version control
// ---------------------------------------------------------------------------

/// Records every git call; optionally fails at one step.
#[derive(Default)]
pub struct FakeVcs {
    fail_at: Option<&'static str>,
    calls: Mutex<Vec<String>>,
    workspaces: Mutex<Vec<PathBuf>>,
    staged: Mutex<Vec<(String, String)>>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail at `step`: one of "clone", "add", "commit", "push".
    pub fn failing_at(step: &'static str) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Destination directories passed to clone.
    pub fn workspaces(&self) -> Vec<PathBuf> {
        self.workspaces.lock().unwrap().clone()
    }

    /// `(path, contents)` of every file staged, read at `add` time.
    pub fn staged(&self) -> Vec<(String, String)> {
        self.staged.lock().unwrap().clone()
    }

    fn step(&self, step: &'static str, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_at == Some(step) {
            return Err(Error::VcsOperationFailed {
                stderr: format!("fatal: {step} rejected by remote\n"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Vcs for FakeVcs {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        assert!(dest.is_dir(), "workspace must exist before clone");
        self.workspaces.lock().unwrap().push(dest.to_path_buf());
        self.step("clone", format!("clone {url}"))
    }

    async fn add(&self, dest: &Path, path: &str) -> Result<()> {
        let contents = std::fs::read_to_string(dest.join(path)).unwrap_or_default();
        self.staged.lock().unwrap().push((path.to_string(), contents));
        self.step("add", format!("add {path}"))
    }

    async fn commit(&self, _dest: &Path, message: &str) -> Result<()> {
        self.step("commit", format!("commit {message}"))
    }

    async fn push(&self, _dest: &Path) -> Result<()> {
        self.step("push", "push".to_string())
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Returns fixed source text and remembers what it was asked for.
pub struct ScriptedCoder {
    output: String,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedCoder {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeGenerator for ScriptedCoder {
    async fn generate(&self, description: &str, target_path: &str) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((description.to_string(), target_path.to_string()));
        Ok(self.output.clone())
    }
}

pub struct FailingChecklist;

#[async_trait]
impl ChecklistGenerator for FailingChecklist {
    async fn checklist(&self, _description: &str, _changes: &[String]) -> Result<String> {
        Err(Error::Other("checklist tool returned 502".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Ledger and store
// ---------------------------------------------------------------------------

/// In-memory ledger that can be told to fail creation or completion.
pub struct FlakyLedger {
    pub inner: InMemoryLedger,
    fail_create: bool,
    fail_update: bool,
}

impl FlakyLedger {
    pub fn down() -> Self {
        Self {
            inner: InMemoryLedger::new(),
            fail_create: true,
            fail_update: true,
        }
    }

    pub fn failing_updates() -> Self {
        Self {
            inner: InMemoryLedger::new(),
            fail_create: false,
            fail_update: true,
        }
    }
}

#[async_trait]
impl TaskLedger for FlakyLedger {
    async fn create_task(&self, description: &str, context: serde_json::Value) -> Result<Task> {
        if self.fail_create {
            return Err(Error::LedgerUnavailable("connection refused".to_string()));
        }
        self.inner.create_task(description, context).await
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task> {
        if self.fail_update {
            return Err(Error::LedgerUnavailable("connection reset".to_string()));
        }
        self.inner.update_status(id, status).await
    }
}

/// Ledger whose ids are always zero.
pub struct ZeroIdLedger;

#[async_trait]
impl TaskLedger for ZeroIdLedger {
    async fn create_task(&self, description: &str, context: serde_json::Value) -> Result<Task> {
        Ok(Task {
            id: 0,
            description: description.to_string(),
            status: "pending".to_string(),
            context,
        })
    }

    async fn update_status(&self, _id: TaskId, _status: TaskStatus) -> Result<Task> {
        Err(Error::LedgerUnavailable("unexpected call".to_string()))
    }
}

/// Graph store that rejects writes touching the given labels.
pub struct FlakyStore {
    pub graph: Arc<InMemoryGraph>,
    fail_labels: Vec<&'static str>,
}

impl FlakyStore {
    pub fn failing(graph: Arc<InMemoryGraph>, fail_labels: Vec<&'static str>) -> Self {
        Self { graph, fail_labels }
    }

    fn check(&self, label: &str) -> Result<()> {
        if self.fail_labels.contains(&label) {
            return Err(Error::StoreUnavailable(format!("write to {label} timed out")));
        }
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for FlakyStore {
    async fn add_node(&self, label: &str, properties: Properties) -> Result<()> {
        self.check(label)?;
        self.graph.add_node(label, properties).await
    }

    async fn add_relationship(
        &self,
        start_label: &str,
        start_key: Properties,
        end_label: &str,
        end_key: Properties,
        rel_type: &str,
    ) -> Result<()> {
        self.check(start_label)?;
        self.check(end_label)?;
        self.graph
            .add_relationship(start_label, start_key, end_label, end_key, rel_type)
            .await
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// In-memory collaborators plus a temporary workspace root.
pub struct Harness {
    pub ledger: Arc<InMemoryLedger>,
    pub graph: Arc<InMemoryGraph>,
    pub vcs: Arc<FakeVcs>,
    pub coder: Arc<ScriptedCoder>,
    pub notifier: Arc<RecordingNotifier>,
    pub root: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_vcs(FakeVcs::new())
    }

    pub fn with_vcs(vcs: FakeVcs) -> Self {
        Self {
            ledger: Arc::new(InMemoryLedger::new()),
            graph: Arc::new(InMemoryGraph::new()),
            vcs: Arc::new(vcs),
            coder: Arc::new(ScriptedCoder::new(FIB_SOURCE)),
            notifier: Arc::new(RecordingNotifier::default()),
            root: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn workspace_root(&self) -> PathBuf {
        self.root.path().join("mcp_workspace")
    }

    pub fn ports(&self) -> Ports {
        Ports {
            ledger: self.ledger.clone(),
            store: self.graph.clone(),
            coder: self.coder.clone(),
            writer: Arc::new(PlaceholderWriter),
            checklists: Arc::new(TemplateChecklist),
            vcs: self.vcs.clone(),
            notifier: Some(self.notifier.clone()),
        }
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            workspace_root: self.workspace_root(),
            default_repo_url: Some(REPO_URL.to_string()),
            target_file: "fibonacci.py".to_string(),
        }
    }

    pub fn engine(&self) -> Engine {
        Engine::new(self.ports(), self.config())
    }

    pub fn engine_with(&self, ports: Ports) -> Engine {
        Engine::new(ports, self.config())
    }
}
