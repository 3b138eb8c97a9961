//! Error types for the tracking engine.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Comprehensive error type for all engine operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// File system read/write errors, scoped to a single path
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A file expected to be a plan is missing the plan sentinel
    #[error("File '{path}' is not a recognized plan document")]
    NotAPlan { path: PathBuf },
    /// History file could not be parsed or regenerated
    #[error("History error for '{path}': {message}")]
    History { path: PathBuf, message: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
}

impl TrackerError {
    /// Creates a file system error for the given path.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Creates a history error with a message.
    pub fn history(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        TrackerError::History {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Extension trait mapping `std::io::Error` results into [`TrackerError`]
/// with the offending path attached.
pub trait IoResultExt<T> {
    /// Attach a path to an I/O error.
    fn path_context(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn path_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| TrackerError::file_system(path, e))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, TrackerError>;
