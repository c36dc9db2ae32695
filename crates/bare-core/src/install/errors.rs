use crate::errors::BareError;
use crate::install::types::PackageManager;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("{manager} install failed (exit {code}): {message}")]
    InstallFailed {
        manager: PackageManager,
        code: i32,
        message: String,
    },

    #[error("Failed to execute {manager}: {message}")]
    SpawnFailed {
        manager: PackageManager,
        message: String,
    },
}

impl BareError for InstallError {
    fn error_code(&self) -> &'static str {
        match self {
            InstallError::InstallFailed { .. } => "INSTALL_FAILED",
            InstallError::SpawnFailed { .. } => "INSTALL_SPAWN_FAILED",
        }
    }
}
