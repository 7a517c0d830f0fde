//! Error types for SortDir
//!
//! Setup failures are fatal and end the run with exit code 1. Everything that
//! happens to a single entry or file during the walk or the copy pass is
//! reported once and skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SortDir operations
#[derive(Error, Debug)]
pub enum SortDirError {
    /// Bad command line (argument count, unknown flag)
    #[error("{0}")]
    Usage(String),

    /// Sort key other than "1" or "2"
    #[error("invalid sort key '{0}' (expected 1 for size or 2 for name)")]
    InvalidSortKey(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error with path context
    #[error("{source} {path}")]
    Io {
        /// Path the operation was working on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Source path exists but is not a directory
    #[error("source is not a directory {0}")]
    SourceNotDirectory(PathBuf),

    /// Destination path exists but is not a directory
    #[error("destination is not a directory {0}")]
    DestinationNotDirectory(PathBuf),

    /// Destination directory is not writable
    #[error("destination is not writable {0}")]
    DestinationNotWritable(PathBuf),

    /// Read failure while copying file contents
    #[error("read failed: {source} {path}")]
    ReadFailed {
        /// Source file being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Write failure while copying file contents
    #[error("write failed: {source} {path}")]
    WriteFailed {
        /// Destination file being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Every collision suffix up to the limit is already taken
    #[error("no free name after {attempts} collision suffixes {path}")]
    CollisionLimit {
        /// Unsuffixed destination path
        path: PathBuf,
        /// Highest suffix tried
        attempts: u32,
    },
}

impl SortDirError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::SourceNotDirectory(path)
            | Self::DestinationNotDirectory(path)
            | Self::DestinationNotWritable(path)
            | Self::ReadFailed { path, .. }
            | Self::WriteFailed { path, .. }
            | Self::CollisionLimit { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Error text without the trailing path, for `<program>: <description> <path>` lines
    pub fn description(&self) -> String {
        match self {
            Self::Io { source, .. } => source.to_string(),
            Self::SourceNotDirectory(_) => "source is not a directory".to_string(),
            Self::DestinationNotDirectory(_) => "destination is not a directory".to_string(),
            Self::DestinationNotWritable(_) => "destination is not writable".to_string(),
            Self::ReadFailed { source, .. } => format!("read failed: {}", source),
            Self::WriteFailed { source, .. } => format!("write failed: {}", source),
            Self::CollisionLimit { attempts, .. } => {
                format!("no free name after {} collision suffixes", attempts)
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for SortDir operations
pub type Result<T> = std::result::Result<T, SortDirError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SortDirError::io(path, e))
    }
}
