//! Orchestration pipeline.
//!
//! Composes the cloner, worktree manager, file propagator, and dependency
//! installer into ordered, progress-reporting operations. Steps within one
//! invocation are strictly sequential; there is no ordering guarantee
//! across invocations, and no rollback: side effects of completed steps
//! persist on failure so a caller may retry the remaining steps.

mod add;
mod clone;
pub mod errors;
mod locks;
mod remove;

use std::sync::Arc;

use crate::config::store::WorktreeConfigStore;
use crate::config::types::{BareConfig, Config};
use crate::install::traits::{CommandInstaller, Installer};
use crate::install::types::PackageManager;

pub use errors::PipelineError;

/// The worktree lifecycle orchestrator.
///
/// Operations are synchronous and blocking; callers wanting concurrency run
/// invocations on separate threads. Invocations targeting the same
/// repository serialize their `__main__`-mutating phase on an in-process
/// per-repository lock.
pub struct Pipeline {
    config: Config,
    settings: BareConfig,
    config_store: Arc<dyn WorktreeConfigStore>,
    installer: Arc<dyn Installer>,
    locks: locks::RepoLocks,
}

impl Pipeline {
    pub fn new(
        config: Config,
        settings: BareConfig,
        config_store: Arc<dyn WorktreeConfigStore>,
    ) -> Self {
        Self {
            config,
            settings,
            config_store,
            installer: Arc::new(CommandInstaller::new()),
            locks: locks::RepoLocks::default(),
        }
    }

    /// Replace the installer (tests use this to observe install ordering
    /// without node tooling present).
    pub fn with_installer(mut self, installer: Arc<dyn Installer>) -> Self {
        self.installer = installer;
        self
    }

    pub(crate) fn fallback_manager(&self) -> PackageManager {
        self.settings
            .install
            .default_manager
            .unwrap_or(PackageManager::Pnpm)
    }
}
