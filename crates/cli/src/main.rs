mod cli;
mod commands;
mod config;
mod context;
mod error;
mod report;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use storyconv_storage::SearchQuery;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::handle_lookup_command;
use crate::config::SettingsLoader;
use crate::context::AppContext;
use crate::error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let code = ExitCode::from(&error);
            tracing::error!("{:?}", eyre::Report::new(error));
            code
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = SettingsLoader::new()
        .storage_root(cli.storage.clone())
        .fetch_timeout_secs(cli.timeout)
        .load()?;
    tracing::debug!(storage_root = %settings.storage_root.display(), "Settings loaded");

    let ctx = AppContext::from_settings(&settings)?;
    let query = SearchQuery::parse(&cli.query_text());

    let mut stdout = io::stdout().lock();
    let outcome = handle_lookup_command(&ctx, &query, &mut stdout).await?;
    tracing::debug!(?outcome, "Lookup finished");
    Ok(())
}
