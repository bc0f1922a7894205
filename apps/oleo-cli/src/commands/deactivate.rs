//! Deactivate command - soft-delete a record.

use clap::Args;

use oleo_core::RecordId;
use oleo_store::RecordStore;

use crate::config::Config;
use crate::error::CliResult;
use crate::output::print_success;

/// Arguments for the deactivate command.
#[derive(Args)]
pub struct DeactivateArgs {
    /// Record to deactivate
    pub record_id: RecordId,
}

/// Execute the deactivate command.
pub async fn execute(config: &Config, args: DeactivateArgs) -> CliResult<()> {
    let store = super::open_store(config).await?;
    store.deactivate(args.record_id).await?;
    print_success(&format!("record {} deactivated", args.record_id));
    Ok(())
}
