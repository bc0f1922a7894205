//! Record store error types.

use oleo_core::RecordId;
use thiserror::Error;

/// Errors that can occur during record store operations.
///
/// Unlike provider failures, store failures propagate to the caller as
/// hard errors: an unpersisted linkage result is indistinguishable from
/// "never attempted" and must not be silently dropped.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The record does not exist.
    #[error("business record not found: {record_id}")]
    RecordNotFound { record_id: RecordId },

    /// A stored value could not be interpreted (e.g. an unknown status
    /// string written by an older version).
    #[error("invalid stored value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;
