//! Scratch workspace lifecycle: one directory per task id, destroyed on exit.

use crate::error::Result;
use crate::model::TaskId;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A task-scoped scratch directory.
///
/// Call [`Workspace::release`] on every exit path. If the handler unwinds
/// before that, `Drop` removes the directory synchronously.
pub struct Workspace {
    dir: PathBuf,
    task_id: TaskId,
    released: bool,
}

impl Workspace {
    /// `<root>/<task_id>`, without touching the filesystem.
    pub fn path_for(root: &Path, task_id: TaskId) -> PathBuf {
        root.join(task_id.to_string())
    }

    /// Create a fresh workspace, destroying any leftover directory with the same key.
    pub async fn acquire(root: &Path, task_id: TaskId) -> Result<Self> {
        let dir = Self::path_for(root, task_id);
        if tokio::fs::try_exists(&dir).await? {
            warn!(task_id = %task_id, dir = %dir.display(), "removing stale workspace");
            tokio::fs::remove_dir_all(&dir).await?;
        }
        // `git clone` accepts an existing directory only while it is empty.
        tokio::fs::create_dir_all(&dir).await?;

        debug!(task_id = %task_id, dir = %dir.display(), "workspace created");
        Ok(Self {
            dir,
            task_id,
            released: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove the workspace directory. On failure `Drop` tries once more.
    pub async fn release(mut self) -> Result<()> {
        self.remove().await
    }

    async fn remove(&mut self) -> Result<()> {
        if tokio::fs::try_exists(&self.dir).await? {
            tokio::fs::remove_dir_all(&self.dir).await?;
        }
        self.released = true;
        debug!(task_id = %self.task_id, "workspace released");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(task_id = %self.task_id, "workspace cleanup error: {e}");
            }
        }
    }
}
