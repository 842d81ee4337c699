//! Typed error handling for logmigrate.
//!
//! Every stage of the pipeline returns [`MigrateResult`], so callers can tell
//! a missing library apart from a filesystem failure halfway through a scan.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for logmigrate operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// I/O error when reading, copying or writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The library path given by the user does not exist
    #[error("Library path '{path}' does not exist")]
    LibraryNotFound { path: PathBuf },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A usage pattern failed to compile
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MigrateError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an I/O error that has no underlying `std::io::Error`.
    pub fn io_message(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a pattern error.
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create the error for a library path that exists but is not a directory.
    pub fn not_a_directory(path: impl AsRef<Path>) -> Self {
        Self::invalid_argument(format!("'{}' is not a directory", path.as_ref().display()))
    }

    /// Whether this error comes from bad user input rather than the filesystem.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::LibraryNotFound { .. } | Self::InvalidArgument { .. } | Self::Config { .. }
        )
    }
}

/// Convenience type alias for logmigrate results.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> MigrateResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> MigrateResult<T> {
        self.map_err(|e| MigrateError::io(path, e))
    }
}
