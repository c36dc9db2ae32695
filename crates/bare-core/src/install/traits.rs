use std::path::Path;

use crate::install::errors::InstallError;
use crate::install::operations;
use crate::install::types::PackageManager;

/// Seam between the orchestration pipeline and the package manager.
///
/// The pipeline is handed an installer rather than shelling out directly,
/// so tests can observe install ordering without node tooling present.
pub trait Installer: Send + Sync {
    fn install(&self, root: &Path, manager: PackageManager) -> Result<(), InstallError>;
}

/// Production installer: runs `<manager> install` as a subprocess.
#[derive(Default)]
pub struct CommandInstaller;

impl CommandInstaller {
    pub fn new() -> Self {
        Self
    }
}

impl Installer for CommandInstaller {
    fn install(&self, root: &Path, manager: PackageManager) -> Result<(), InstallError> {
        operations::install(root, manager)
    }
}
