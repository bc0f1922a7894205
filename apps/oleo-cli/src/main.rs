//! oleo CLI - registration and account-linking operations for the
//! association dashboard.
//!
//! Commands:
//! - register a business record, with or without credentials
//! - retry linking for a record that is pending or password_mismatch
//! - show one record, list records by linkage status
//! - look up the sign-in methods the provider knows for an email
//! - deactivate a record (soft delete)

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod logging;
mod output;

use config::Config;
use error::CliResult;

/// oleo - record registration and account linking
#[derive(Parser)]
#[command(name = "oleo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a business record and attempt linking
    Register(commands::register::RegisterArgs),

    /// Retry linking for an existing record
    Retry(commands::retry::RetryArgs),

    /// Display one record
    Show(commands::show::ShowArgs),

    /// List records by linkage status
    List(commands::list::ListArgs),

    /// List the provider's sign-in methods for an email
    Methods(commands::methods::MethodsArgs),

    /// Deactivate a record (soft delete)
    Deactivate(commands::deactivate::DeactivateArgs),
}

async fn run(cli: Cli, config: &Config) -> CliResult<()> {
    match cli.command {
        Commands::Register(args) => commands::register::execute(config, args).await,
        Commands::Retry(args) => commands::retry::execute(config, args).await,
        Commands::Show(args) => commands::show::execute(config, args).await,
        Commands::List(args) => commands::list::execute(config, args).await,
        Commands::Methods(args) => commands::methods::execute(config, args).await,
        Commands::Deactivate(args) => commands::deactivate::execute(config, args).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };
    logging::init(&config.rust_log, config.log_format);

    if let Err(err) = run(cli, &config).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
