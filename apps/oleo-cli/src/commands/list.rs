//! List command - records by linkage status.

use clap::Args;

use oleo_store::{LinkageStatus, RecordStore};

use crate::config::Config;
use crate::error::CliResult;
use crate::output::{print_info, print_record_line};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Status to filter on: complete, pending, password_mismatch or unlinked
    #[arg(long, default_value = "pending")]
    pub status: LinkageStatus,
}

/// Execute the list command.
pub async fn execute(config: &Config, args: ListArgs) -> CliResult<()> {
    let store = super::open_store(config).await?;

    let records = store.list_by_status(args.status).await?;
    if records.is_empty() {
        print_info(&format!("no records with status {}", args.status));
        return Ok(());
    }

    for record in &records {
        print_record_line(record);
    }
    print_info(&format!("{} record(s)", records.len()));
    Ok(())
}
