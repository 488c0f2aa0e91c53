//! The search-sql CLI.
//!
//! Run `search-sql --help` for usage.

use std::path::PathBuf;

use clap::Parser;

use search_sql_cli::*;
use search_sql_configuration::environment::ProcessEnvironment;

/// Query a search engine's SQL endpoints.
#[derive(Debug, Parser)]
#[command(version)]
pub struct CliArgs {
    /// The path to the configuration directory.
    #[arg(
        long = "configuration",
        env = "SEARCH_SQL_CONFIGURATION_DIRECTORY",
        default_value = "."
    )]
    pub context_path: PathBuf,
    /// The command to invoke.
    #[command(subcommand)]
    pub subcommand: Command,
}

/// The application entrypoint. It pulls information from the environment and then calls the [run]
/// function.
#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let context = Context {
        context_path: args.context_path,
        environment: ProcessEnvironment,
    };
    run(args.subcommand, context, &mut std::io::stdout()).await?;
    Ok(())
}
