//! Error types for OxiCite operations.
//!
//! Decoding itself never fails: malformed ID bytes and index records are
//! recovered locally and reported as diagnostics by the decoding crates.
//! The errors here are the ones allowed to fail a whole author, chiefly
//! I/O on the source files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for OxiCite operations.
#[derive(Debug, Error)]
pub enum CiteError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    SourceUnreadable {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for OxiCite operations.
pub type Result<T> = std::result::Result<T, CiteError>;

impl CiteError {
    /// Create a source-unreadable error.
    pub fn source_unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check whether this error came from the file system.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::SourceUnreadable { .. })
    }
}

/// Read a whole source file, tagging failures with the path.
pub fn read_source(path: impl Into<PathBuf>) -> Result<Vec<u8>> {
    let path = path.into();
    std::fs::read(&path).map_err(|source| CiteError::source_unreadable(path, source))
}
