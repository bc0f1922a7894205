//! CLI subcommands.

pub mod deactivate;
pub mod list;
pub mod methods;
pub mod register;
pub mod retry;
pub mod show;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use oleo_linkage::LinkageService;
use oleo_provider::RestCredentialProvider;
use oleo_store::PgRecordStore;

use crate::config::Config;
use crate::error::CliResult;

/// Open the record store, running pending migrations.
pub(crate) async fn open_store(config: &Config) -> CliResult<Arc<PgRecordStore>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    PgRecordStore::migrate(&pool).await?;
    info!("record store ready, migrations applied");
    Ok(Arc::new(PgRecordStore::new(pool)))
}

/// Build the REST credential provider from config.
pub(crate) fn build_provider(config: &Config) -> CliResult<Arc<RestCredentialProvider>> {
    Ok(Arc::new(RestCredentialProvider::new(config.provider())?))
}

/// Wire up the full linkage service.
pub(crate) async fn linkage_service(config: &Config) -> CliResult<LinkageService> {
    let store = open_store(config).await?;
    let provider = build_provider(config)?;
    debug!(provider = %config.provider_base_url, "linkage service wired");
    Ok(LinkageService::new(provider, store))
}
