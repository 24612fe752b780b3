//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain/service errors to a single line for stderr.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StorageError::RepositoryNotFound(path)) => {
            format!("error: not a gat repository: {}", path.display())
        }
        ApiError::StorageError(inner) => format!("error: {}", inner),
        ApiError::VerificationFailed(report) => {
            format!("error: object store verification failed\n{}", report)
        }
        other => format!("error: {}", other),
    }
}
