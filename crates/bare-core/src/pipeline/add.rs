use std::path::{Path, PathBuf};

use tracing::info;

use crate::detect;
use crate::files;
use crate::git;
use crate::git::types::MAIN_WORKTREE;
use crate::install::types::PackageManager;
use crate::pipeline::{Pipeline, PipelineError};
use crate::progress::{PipelineStage, ProgressSink, Reporter};

impl Pipeline {
    /// Create a worktree with the full five-step pipeline:
    /// update `__main__`, install there, create the worktree, propagate
    /// files, install in the worktree.
    ///
    /// The progress stream walks `Updating → InstallingMain →
    /// CreatingWorktree → PropagatingFiles → InstallingWorktree` and ends
    /// with exactly one terminal marker. Returns the new worktree's
    /// absolute path.
    pub fn add_worktree(
        &self,
        repo_root: &Path,
        name: &str,
        branch: Option<&str>,
        sink: Box<dyn ProgressSink>,
    ) -> Result<PathBuf, PipelineError> {
        let mut reporter = Reporter::new(sink);
        match self.run_add(repo_root, name, branch, &mut reporter) {
            Ok(path) => {
                reporter.complete();
                Ok(path)
            }
            Err(e) => {
                reporter.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Update `__main__` and install its dependencies (pipeline steps 1-2).
    pub fn sync_main(
        &self,
        repo_root: &Path,
        sink: Box<dyn ProgressSink>,
    ) -> Result<(), PipelineError> {
        let mut reporter = Reporter::new(sink);
        match self.run_sync(repo_root, &mut reporter) {
            Ok(()) => {
                reporter.complete();
                Ok(())
            }
            Err(e) => {
                reporter.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn run_add(
        &self,
        repo_root: &Path,
        name: &str,
        branch: Option<&str>,
        reporter: &mut Reporter,
    ) -> Result<PathBuf, PipelineError> {
        let op_id = uuid::Uuid::new_v4().to_string();
        info!(
            event = "core.pipeline.add_started",
            op_id = %op_id,
            name = name,
            branch = branch.unwrap_or("<new>"),
            path = %repo_root.display()
        );

        // Worktree config is read once, here; later edits do not affect
        // this invocation.
        let wt_config = self.config_store.get(repo_root);
        let upstream = wt_config
            .upstream_remote
            .clone()
            .unwrap_or_else(|| self.settings.git.upstream_remote.clone());

        let manager = self.update_and_install_main(repo_root, &upstream, reporter)?;

        reporter.stage(PipelineStage::CreatingWorktree);
        let worktree_path = git::worktree::add_worktree(repo_root, name, branch, &upstream)?;
        reporter.line(format!("Created worktree '{}'", name));

        reporter.stage(PipelineStage::PropagatingFiles);
        let summary =
            files::propagate(&wt_config, &repo_root.join(MAIN_WORKTREE), &worktree_path)?;
        reporter.line(format!(
            "Propagated files: {} linked, {} copied, {} skipped",
            summary.linked, summary.copied, summary.skipped
        ));

        reporter.stage(PipelineStage::InstallingWorktree);
        reporter.line(format!(
            "Installing dependencies in '{}' ({})",
            name, manager
        ));
        self.installer.install(&worktree_path, manager)?;

        info!(
            event = "core.pipeline.add_completed",
            op_id = %op_id,
            name = name,
            worktree_path = %worktree_path.display()
        );

        Ok(worktree_path)
    }

    fn run_sync(&self, repo_root: &Path, reporter: &mut Reporter) -> Result<(), PipelineError> {
        let op_id = uuid::Uuid::new_v4().to_string();
        info!(
            event = "core.pipeline.sync_started",
            op_id = %op_id,
            path = %repo_root.display()
        );

        let wt_config = self.config_store.get(repo_root);
        let upstream = wt_config
            .upstream_remote
            .clone()
            .unwrap_or_else(|| self.settings.git.upstream_remote.clone());

        self.update_and_install_main(repo_root, &upstream, reporter)?;

        info!(event = "core.pipeline.sync_completed", op_id = %op_id);
        Ok(())
    }

    /// Steps 1-2, serialized per repository: `__main__` is shared mutable
    /// state across invocations.
    fn update_and_install_main(
        &self,
        repo_root: &Path,
        upstream: &str,
        reporter: &mut Reporter,
    ) -> Result<PackageManager, PipelineError> {
        let lock = self.locks.lock_for(repo_root);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        reporter.stage(PipelineStage::Updating);
        reporter.line(format!("Updating __main__ from {}/main", upstream));
        git::worktree::update_main(repo_root, upstream)?;

        // Detect after the pull: it may have changed the lockfile set.
        let manager = detect::detect_package_manager(repo_root, self.fallback_manager());

        reporter.stage(PipelineStage::InstallingMain);
        reporter.line(format!(
            "Installing dependencies in __main__ ({})",
            manager
        ));
        self.installer
            .install(&repo_root.join(MAIN_WORKTREE), manager)?;

        Ok(manager)
    }
}
