use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Repository layout classification, detected from marker files in the
/// `__main__` worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    Turborepo,
    Nx,
    Lerna,
    Workspace,
    #[default]
    Standard,
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepoKind::Turborepo => "turborepo",
            RepoKind::Nx => "nx",
            RepoKind::Lerna => "lerna",
            RepoKind::Workspace => "workspace",
            RepoKind::Standard => "standard",
        };
        write!(f, "{}", name)
    }
}

/// A registered repository.
///
/// Owned by the registry; the orchestrator only reads `path` and
/// `remote_url`, and produces a populated record after a clone. Persistence
/// lives behind [`super::store::RepositoryStore`], outside this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub id: String,
    /// Display name (the clone target directory name).
    pub name: String,
    /// Absolute bare-repo root (not a worktree).
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub kind: RepoKind,
    /// RFC3339 registration timestamp.
    pub added_at: String,
    /// RFC3339 timestamp of the last successful sync.
    pub last_synced: String,
}

impl Repository {
    pub fn new(name: String, path: PathBuf, remote_url: Option<String>, kind: RepoKind) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            path,
            remote_url,
            kind,
            added_at: now.clone(),
            last_synced: now,
        }
    }
}
