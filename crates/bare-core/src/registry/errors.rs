use crate::errors::BareError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Repository already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Repository not found: {id}")]
    NotFound { id: String },
}

impl BareError for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::AlreadyExists { .. } => "REPOSITORY_ALREADY_EXISTS",
            RegistryError::NotFound { .. } => "REPOSITORY_NOT_FOUND",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
