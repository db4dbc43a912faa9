//! Brewlog CLI - Command-line interface for the tea catalogue
//!
//! Works offline first: every change lands in the local store and is
//! uploaded whenever the API is reachable.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{ClockCommands, Cli, Commands};
use crate::commands::add::{run_add_tea, run_start_session};
use crate::commands::clock::{run_clock_cancel, run_clock_list, run_clock_start};
use crate::commands::common::Context;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::list::{run_list, run_pending};
use crate::commands::sync::{run_sync, run_upload};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("brewlog=info,brewlog_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let ctx = Context::resolve(cli.db_path, cli.api_url, cli.timeout_ms)?;
    match cli.command {
        Commands::Sync { kind } => run_sync(&ctx, kind).await,
        Commands::Upload { kind } => run_upload(&ctx, kind).await,
        Commands::List {
            kind,
            refresh,
            json,
        } => run_list(&ctx, kind, refresh, json).await,
        Commands::AddTea {
            name,
            category,
            vendor,
            year,
        } => run_add_tea(&ctx, &name, category, vendor.as_deref(), year).await,
        Commands::StartSession {
            initial,
            increments,
            tea,
            clock,
        } => run_start_session(&ctx, &initial, &increments, tea.as_deref(), clock).await,
        Commands::Delete { kind, local_id } => run_delete(&ctx, kind, local_id).await,
        Commands::Clock { command } => match command {
            ClockCommands::Start { session } => run_clock_start(&ctx, session).await,
            ClockCommands::Cancel { session } => run_clock_cancel(&ctx, session).await,
            ClockCommands::List { json } => run_clock_list(&ctx, json).await,
        },
        Commands::Pending { kind, json } => run_pending(&ctx, kind, json).await,
        Commands::Completions { .. } => Ok(()),
    }
}
