//! Error type shared by the dice stage loaders and resolvers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("invalid die color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {reason}")]
    Settings { path: PathBuf, reason: String },

    #[error("failed to parse dice library: {0}")]
    Library(#[from] serde_json::Error),
}

impl StageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StageError::Io {
            path: path.into(),
            source,
        }
    }
}
