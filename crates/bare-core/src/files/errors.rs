use crate::errors::BareError;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Failed to symlink '{source_path}' to '{dest_path}': {message}")]
    SymlinkFailed {
        source_path: String,
        dest_path: String,
        message: String,
    },

    #[error("Failed to copy '{source_path}' to '{dest_path}': {message}")]
    CopyFailed {
        source_path: String,
        dest_path: String,
        message: String,
    },

    #[error("IO error during file propagation: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl BareError for FileError {
    fn error_code(&self) -> &'static str {
        match self {
            FileError::SymlinkFailed { .. } => "FILE_SYMLINK_FAILED",
            FileError::CopyFailed { .. } => "FILE_COPY_FAILED",
            FileError::IoError { .. } => "FILE_IO_ERROR",
        }
    }
}
