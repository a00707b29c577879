use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GkError {
    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Operation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl GkError {
    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Path the error refers to, when one is known
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileSystemError { path, .. } => path.as_ref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GkError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<walkdir::Error> for GkError {
    fn from(error: walkdir::Error) -> Self {
        let path = error.path().map(|p| p.to_path_buf());
        let message = match error.path() {
            Some(p) => format!("Failed to walk {}", p.display()),
            None => "Failed to walk directory".to_string(),
        };
        match error.into_io_error() {
            Some(io_error) => Self::filesystem_error_with_source(message, path, io_error),
            None => Self::filesystem_error(format!("{} (filesystem loop)", message), path),
        }
    }
}
