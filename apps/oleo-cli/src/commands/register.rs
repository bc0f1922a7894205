//! Register command - create a business record and run its first link
//! attempt.

use clap::Args;

use oleo_store::{LinkageStatus, NewBusinessRecord, RecordRole};

use crate::config::Config;
use crate::error::CliResult;
use crate::output::{print_info, print_record, print_success};

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Email for the record (and the credential, when a password is given)
    pub email: String,

    /// Role: administrator, commercial_agent or user
    #[arg(long, default_value = "user")]
    pub role: RecordRole,

    /// Display name shown in the dashboard
    #[arg(long)]
    pub display_name: Option<String>,

    /// Password for the credential; omit to register without auth
    #[arg(long)]
    pub password: Option<String>,
}

/// Execute the register command.
pub async fn execute(config: &Config, args: RegisterArgs) -> CliResult<()> {
    let service = super::linkage_service(config).await?;

    let outcome = service
        .register(
            NewBusinessRecord {
                role: args.role,
                email: args.email,
                display_name: args.display_name,
            },
            args.password.as_deref(),
        )
        .await?;

    match outcome.link.status {
        LinkageStatus::Complete => print_success("record registered and linked"),
        LinkageStatus::Unlinked => print_success("record registered without credential"),
        status => {
            print_success(&format!("record registered, linkage is {status}"));
            if let Some(detail) = &outcome.link.error_detail {
                print_info(detail);
            }
            print_info(&format!(
                "retry later with: oleo retry {} --email {} --password <password>",
                outcome.record.id, outcome.record.email
            ));
        }
    }

    println!();
    print_record(&outcome.record);
    Ok(())
}
