//! Retry command - re-run linking for a record with fresh credentials.

use clap::Args;

use oleo_core::RecordId;
use oleo_store::LinkageStatus;

use crate::config::Config;
use crate::error::CliResult;
use crate::output::{print_info, print_success};

/// Arguments for the retry command.
#[derive(Args)]
pub struct RetryArgs {
    /// Record to retry
    pub record_id: RecordId,

    /// Email for the credential
    #[arg(long)]
    pub email: String,

    /// Password for the credential
    #[arg(long)]
    pub password: String,
}

/// Execute the retry command.
pub async fn execute(config: &Config, args: RetryArgs) -> CliResult<()> {
    let service = super::linkage_service(config).await?;

    let result = service
        .retry_link(args.record_id, &args.email, &args.password)
        .await?;

    match result.status {
        LinkageStatus::Complete => {
            print_success(&format!(
                "record linked to identity {}",
                result.auth_identity_ref.as_deref().unwrap_or("-")
            ));
        }
        status => {
            print_success(&format!("linkage is {status}"));
            if let Some(detail) = &result.error_detail {
                print_info(detail);
            }
        }
    }
    Ok(())
}
