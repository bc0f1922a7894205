//! CLI error types and exit codes.

use thiserror::Error;

use oleo_core::OleoError;
use oleo_linkage::LinkageError;
use oleo_provider::ProviderError;
use oleo_store::StoreError;

use crate::config::ConfigError;

/// Exit codes for the CLI:
/// - 0: success
/// - 1: general error
/// - 2: configuration or input error
/// - 3: provider error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Linkage(#[from] LinkageError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Surface(#[from] OleoError),
}

impl CliError {
    /// Exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Linkage(LinkageError::Validation { .. }) => 2,
            CliError::Provider(_) => 3,
            _ => 1,
        }
    }
}
