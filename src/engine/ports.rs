//! The collaborators a run talks to, and how they are wired from config.

use std::path::PathBuf;
use std::sync::Arc;

use crate::checklist::{ChecklistGenerator, HttpChecklist, TemplateChecklist};
use crate::config::{Config, DEFAULT_TARGET_FILE};
use crate::error::Result;
use crate::ledger::TaskLedger;
use crate::ledger::http::HttpLedger;
use crate::ledger::memory::InMemoryLedger;
use crate::llm::anthropic::AnthropicGenerator;
use crate::llm::placeholder::{PlaceholderWriter, UnconfiguredCoder};
use crate::llm::{CodeGenerator, TextGenerator};
use crate::memory::MemoryStore;
use crate::memory::graph::InMemoryGraph;
use crate::memory::http::HttpMemoryStore;
use crate::notify::{Notifier, TeamsWebhook};
use crate::vcs::{GitCli, Vcs};

/// Every external port the node handlers use.
#[derive(Clone)]
pub struct Ports {
    pub ledger: Arc<dyn TaskLedger>,
    pub store: Arc<dyn MemoryStore>,
    pub coder: Arc<dyn CodeGenerator>,
    pub writer: Arc<dyn TextGenerator>,
    pub checklists: Arc<dyn ChecklistGenerator>,
    pub vcs: Arc<dyn Vcs>,
    /// Completion notifications are optional.
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl Ports {
    /// Remote collaborators on the tool server at `config.mcp_server_url`.
    pub fn remote(config: &Config) -> Result<Self> {
        let client = crate::http::client(config.http_timeout)?;
        let base = config.mcp_server_url.as_str();
        let (coder, writer) = generators(config)?;

        Ok(Self {
            ledger: Arc::new(HttpLedger::new(client.clone(), base)),
            store: Arc::new(HttpMemoryStore::new(client.clone(), base)),
            coder,
            writer,
            checklists: Arc::new(HttpChecklist::new(client.clone(), base)),
            vcs: Arc::new(git(config)),
            notifier: notifier(config, &client),
        })
    }

    /// In-process ledger and graph; generation, git and notifications as configured.
    ///
    /// Returns the concrete ledger and graph too so callers can inspect them.
    pub fn local(config: &Config) -> Result<(Self, Arc<InMemoryLedger>, Arc<InMemoryGraph>)> {
        let client = crate::http::client(config.http_timeout)?;
        let ledger = Arc::new(InMemoryLedger::new());
        let graph = Arc::new(InMemoryGraph::new());
        let (coder, writer) = generators(config)?;

        let ports = Self {
            ledger: ledger.clone(),
            store: graph.clone(),
            coder,
            writer,
            checklists: Arc::new(TemplateChecklist),
            vcs: Arc::new(git(config)),
            notifier: notifier(config, &client),
        };
        Ok((ports, ledger, graph))
    }
}

fn generators(config: &Config) -> Result<(Arc<dyn CodeGenerator>, Arc<dyn TextGenerator>)> {
    let Some(key) = &config.anthropic_api_key else {
        let coder: Arc<dyn CodeGenerator> = Arc::new(UnconfiguredCoder);
        let writer: Arc<dyn TextGenerator> = Arc::new(PlaceholderWriter);
        return Ok((coder, writer));
    };
    let generator = Arc::new(AnthropicGenerator::new(key, config.generation_model.as_str())?);
    let coder: Arc<dyn CodeGenerator> = generator.clone();
    let writer: Arc<dyn TextGenerator> = generator;
    Ok((coder, writer))
}

fn git(config: &Config) -> GitCli {
    GitCli::new(config.git_timeout)
        .with_author(config.git_author_name.clone(), config.git_author_email.clone())
}

fn notifier(config: &Config, client: &reqwest::Client) -> Option<Arc<dyn Notifier>> {
    config.teams_webhook_url.clone().map(|url| {
        Arc::new(TeamsWebhook::new(client.clone(), url)) as Arc<dyn Notifier>
    })
}

/// Engine settings that are not collaborators.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Parent of the per-task scratch workspaces.
    pub workspace_root: PathBuf,
    /// Cloned when a run carries no repository of its own.
    pub default_repo_url: Option<String>,
    /// File the coding handler generates, relative to the repository root.
    pub target_file: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workspace_root: std::env::temp_dir().join("mcp_workspace"),
            default_repo_url: None,
            target_file: DEFAULT_TARGET_FILE.to_string(),
        }
    }
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            workspace_root: config.workspace_root.clone(),
            default_repo_url: config.default_repo_url.clone(),
            target_file: config.target_file.clone(),
        }
    }
}
