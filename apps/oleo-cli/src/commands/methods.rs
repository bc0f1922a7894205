//! Methods command - sign-in methods the provider knows for an email.

use clap::Args;

use oleo_provider::CredentialProvider;

use crate::config::Config;
use crate::error::CliResult;
use crate::output::print_info;

/// Arguments for the methods command.
#[derive(Args)]
pub struct MethodsArgs {
    /// Email to look up
    pub email: String,
}

/// Execute the methods command.
pub async fn execute(config: &Config, args: MethodsArgs) -> CliResult<()> {
    let provider = super::build_provider(config)?;

    let methods = provider.list_methods_for_email(&args.email).await?;
    if methods.is_empty() {
        print_info(&format!("no sign-in methods registered for {}", args.email));
        return Ok(());
    }

    let mut names: Vec<String> = methods.iter().map(ToString::to_string).collect();
    names.sort();
    for name in names {
        println!("{name}");
    }
    Ok(())
}
