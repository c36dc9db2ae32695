//! Per-repository locking.
//!
//! The `__main__` worktree is shared mutable state: concurrent update and
//! install steps against it would race with only git's internal locking
//! between them. Each repository root gets one in-process mutex; pipeline
//! invocations hold it across the `__main__`-mutating phase only, so
//! concurrent adds for distinct worktree names still overlap in their
//! later steps. Cross-process locking is out of scope.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct RepoLocks {
    inner: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl RepoLocks {
    /// The lock guarding `repo_root`, created on first use.
    pub fn lock_for(&self, repo_root: &Path) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(repo_root.to_path_buf()).or_default().clone()
    }
}
