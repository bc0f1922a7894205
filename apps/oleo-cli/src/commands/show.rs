//! Show command - display one record.

use clap::Args;

use oleo_core::{OleoError, RecordId};
use oleo_store::RecordStore;

use crate::config::Config;
use crate::error::CliResult;
use crate::output::print_record;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Record to display
    pub record_id: RecordId,
}

/// Execute the show command.
pub async fn execute(config: &Config, args: ShowArgs) -> CliResult<()> {
    let store = super::open_store(config).await?;

    let record = store.get(args.record_id).await?.ok_or_else(|| {
        OleoError::not_found("business record", args.record_id.to_string())
    })?;

    print_record(&record);
    Ok(())
}
