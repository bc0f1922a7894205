//! Linkage error types.
//!
//! Deliberately small: credential provider failures are folded into the
//! returned [`LinkageAttemptResult`](crate::LinkageAttemptResult) and are
//! not errors here. What remains is caller mistakes and store failures.

use oleo_core::RecordId;
use oleo_store::StoreError;
use thiserror::Error;

/// Errors that can escape the linkage service.
#[derive(Debug, Error)]
pub enum LinkageError {
    /// Input rejected before any provider or store call; the record is
    /// untouched.
    #[error("validation error on field '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The business record does not exist.
    #[error("business record not found: {record_id}")]
    RecordNotFound { record_id: RecordId },

    /// The store rejected the linkage write. Propagated as a hard failure:
    /// an unpersisted result must not look like "never attempted".
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LinkageError {
    /// Create a validation error for a field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LinkageError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Result type for linkage operations.
pub type LinkageResult<T> = Result<T, LinkageError>;
