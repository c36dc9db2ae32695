//! Registry access interface.
//!
//! The registry itself (a flat keyed store of repository metadata) is an
//! external collaborator; this subsystem performs no registry I/O. The
//! trait exists so callers can inject whatever backing they use, and the
//! in-memory implementation backs tests.

use std::path::Path;
use std::sync::Mutex;

use super::errors::RegistryError;
use super::types::Repository;

/// Keyed access to repository records.
pub trait RepositoryStore: Send + Sync {
    fn list(&self) -> Vec<Repository>;

    fn get(&self, id: &str) -> Option<Repository>;

    fn find_by_path(&self, path: &Path) -> Option<Repository>;

    /// # Errors
    /// Returns `RegistryError::AlreadyExists` if a repository with the same
    /// path is already registered.
    fn add(&self, repo: Repository) -> Result<(), RegistryError>;

    /// # Errors
    /// Returns `RegistryError::NotFound` if no repository matches the id.
    fn remove(&self, id: &str) -> Result<Repository, RegistryError>;
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryRepositoryStore {
    inner: Mutex<Vec<Repository>>,
}

impl MemoryRepositoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryStore for MemoryRepositoryStore {
    fn list(&self) -> Vec<Repository> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn get(&self, id: &str) -> Option<Repository> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    fn find_by_path(&self, path: &Path) -> Option<Repository> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|r| r.path == path)
            .cloned()
    }

    fn add(&self, repo: Repository) -> Result<(), RegistryError> {
        let mut repos = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if repos.iter().any(|r| r.path == repo.path) {
            return Err(RegistryError::AlreadyExists {
                path: repo.path.display().to_string(),
            });
        }
        repos.push(repo);
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<Repository, RegistryError> {
        let mut repos = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let index = repos
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;
        Ok(repos.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::RepoKind;
    use std::path::PathBuf;

    fn sample(name: &str) -> Repository {
        Repository::new(
            name.to_string(),
            PathBuf::from(format!("/repos/{}", name)),
            None,
            RepoKind::Standard,
        )
    }

    #[test]
    fn test_memory_store_add_and_lookup() {
        let store = MemoryRepositoryStore::new();
        let repo = sample("widgets");
        let id = repo.id.clone();
        store.add(repo.clone()).unwrap();

        assert_eq!(store.get(&id), Some(repo.clone()));
        assert_eq!(store.find_by_path(Path::new("/repos/widgets")), Some(repo));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_memory_store_rejects_duplicate_path() {
        let store = MemoryRepositoryStore::new();
        store.add(sample("widgets")).unwrap();

        let result = store.add(sample("widgets"));
        assert!(matches!(result, Err(RegistryError::AlreadyExists { .. })));
    }

    #[test]
    fn test_memory_store_remove() {
        let store = MemoryRepositoryStore::new();
        let repo = sample("widgets");
        let id = repo.id.clone();
        store.add(repo).unwrap();

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.list().is_empty());

        let result = store.remove(&id);
        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
    }
}
