use std::path::Path;

use tracing::warn;

use crate::git;
use crate::git::types::MAIN_WORKTREE;
use crate::pipeline::{Pipeline, PipelineError};

impl Pipeline {
    /// Remove a worktree and best-effort delete its branch.
    ///
    /// The canonical `__main__` worktree is rejected here, at the
    /// orchestration boundary: nothing below this layer enforces it.
    pub fn remove_worktree(&self, repo_root: &Path, name: &str) -> Result<(), PipelineError> {
        if name == MAIN_WORKTREE {
            warn!(
                event = "core.pipeline.remove_rejected",
                name = name,
                path = %repo_root.display(),
                "Refusing to remove the canonical worktree"
            );
            return Err(PipelineError::MainWorktreeProtected);
        }

        git::worktree::remove_worktree(repo_root, name)?;
        Ok(())
    }
}
