//! Error types for the file layer
//!
//! - [`FileError`]: reading or writing a target file
//! - [`LayerError`]: anything a layer operation can fail with

use needle_core::{ConfigError, NeedleError};
use std::path::PathBuf;

/// Errors reading or writing a file in a store
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// File does not exist in the store
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Underlying IO failure
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit
    #[error("file too large: {path} is {size} bytes (max: {max})")]
    FileTooLarge {
        path: PathBuf,
        size: usize,
        max: usize,
    },
}

impl FileError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Map an IO error, turning `NotFound` into [`FileError::NotFound`]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::io_error(path, source)
        }
    }
}

/// Combined file layer error
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error(transparent)]
    Needle(#[from] NeedleError),

    #[error("file error: {0}")]
    File(#[from] FileError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl LayerError {
    /// The insertion error, if this is one
    #[must_use]
    pub fn as_needle(&self) -> Option<&NeedleError> {
        match self {
            Self::Needle(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for layer operations
pub type LayerResult<T> = Result<T, LayerError>;
