//! Error types for the gat version-control engine.

use crate::types::ObjectId;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage-related errors: object store, trees, commits, and refs.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error while trying to {op} {path:?}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt object {id}: {reason}")]
    CorruptObject { id: String, reason: String },

    #[error("Hash mismatch: object stored at {expected} hashes to {actual}")]
    HashMismatch { expected: ObjectId, actual: ObjectId },

    #[error("Invalid object hash {value:?}: {reason}")]
    InvalidHash { value: String, reason: String },

    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Reference file not found: {0:?}")]
    RefNotFound(PathBuf),

    #[error("Not a gat repository (no metadata directory at {0:?})")]
    RepositoryNotFound(PathBuf),

    #[error("Unable to resolve reference: {0}")]
    RefResolution(String),

    #[error("Invalid branch name: {0:?}")]
    InvalidRefName(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl StorageError {
    /// Wrap an I/O failure with the attempted operation and the path involved.
    pub fn io(op: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        StorageError::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn corrupt(id: impl ToString, reason: impl Into<String>) -> Self {
        StorageError::CorruptObject {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Command-level errors surfaced by the API facade and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Object store verification failed\n{0}")]
    VerificationFailed(String),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
