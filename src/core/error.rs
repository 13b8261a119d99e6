//! Error types for the conversation transformer crate.
//!
//! The transformer itself never fails; [`AppError`] covers the surfaces around
//! it: configuration, reading transcript files, and decoding transcript
//! documents.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be built or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Filesystem errors, tagged with the path involved
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document is JSON but not a transcript
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// The tracing subscriber could not be installed
    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
