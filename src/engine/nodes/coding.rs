use std::path::Path;
use tracing::{info, warn};

use crate::engine::ports::{EngineConfig, Ports};
use crate::engine::workspace::Workspace;
use crate::error::{Error, Result};
use crate::model::{TaskId, WorkItem};

const SUCCESS: &str = "Autonomous code generation and push successful.";

/// Commit message used for generated changes.
pub fn commit_message(task_id: TaskId, target_file: &str) -> String {
    format!("conductor: task {task_id}: implement {target_file}")
}

/// Clone, generate, commit and push inside a fresh workspace.
///
/// Never aborts the run: any failure becomes the status message and the run
/// continues to provenance recording. The workspace is gone when this returns.
pub async fn code_execution(
    mut item: WorkItem,
    ports: &Ports,
    config: &EngineConfig,
) -> Result<WorkItem> {
    let task_id = item.require_task_id("code execution")?;

    let workspace = match Workspace::acquire(&config.workspace_root, task_id).await {
        Ok(workspace) => workspace,
        Err(e) => {
            warn!(task_id = %task_id, error = %e, "could not create workspace");
            item.status_message = e.status_message();
            return Ok(item);
        }
    };

    let outcome = generate_and_push(&item, task_id, ports, config, workspace.dir()).await;

    if let Err(e) = workspace.release().await {
        warn!(task_id = %task_id, "workspace cleanup error: {e}");
    }

    match outcome {
        Ok(change) => {
            info!(task_id = %task_id, file = %config.target_file, "change pushed");
            item.code_changes.push(change);
            item.status_message = SUCCESS.to_string();
        }
        Err(e) => {
            warn!(task_id = %task_id, severity = %e.severity(), error = %e, "code execution failed");
            item.status_message = e.status_message();
        }
    }
    Ok(item)
}

async fn generate_and_push(
    item: &WorkItem,
    task_id: TaskId,
    ports: &Ports,
    config: &EngineConfig,
    dir: &Path,
) -> Result<String> {
    let repo_url = item
        .source_event
        .as_ref()
        .and_then(|event| event.repo_url.clone())
        .or_else(|| config.default_repo_url.clone())
        .ok_or_else(|| Error::Other("no repository URL for this run".to_string()))?;

    ports.vcs.clone_repo(&repo_url, dir).await?;

    let code = ports
        .coder
        .generate(&item.description, &config.target_file)
        .await?;

    let target = dir.join(&config.target_file);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, code).await?;

    ports.vcs.add(dir, &config.target_file).await?;
    ports
        .vcs
        .commit(dir, &commit_message(task_id, &config.target_file))
        .await?;
    ports.vcs.push(dir).await?;

    Ok(format!(
        "Created {} with the requested implementations.",
        config.target_file
    ))
}
