//! # oleo-core
//!
//! Shared foundation types for the oleo record-linking service:
//! strongly typed identifiers and the common error type used by the
//! outer surfaces (CLI, adapters).

pub mod error;
pub mod ids;

pub use error::{OleoError, Result};
pub use ids::{ParseIdError, RecordId};
