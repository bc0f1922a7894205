//! Common error type for the outer surfaces of oleo.
//!
//! The linking core has its own per-crate error types; `OleoError` is the
//! small shared vocabulary used by callers that sit above them (the CLI,
//! future HTTP surfaces).

use serde::Serialize;
use thiserror::Error;

/// Standardized error type shared across oleo surfaces.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OleoError {
    /// Requested resource was not found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g., "BusinessRecord").
        resource: String,
        /// Optional identifier of the resource.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Input validation failure.
    #[error("validation error on field '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Description of the validation failure.
        message: String,
    },
}

impl OleoError {
    /// Create a not-found error for a resource type and ID.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Create a validation error for a field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Type alias for Results using [`OleoError`].
pub type Result<T> = std::result::Result<T, OleoError>;
