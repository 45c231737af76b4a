//! ColorCodex CLI - collect colors locally, push them to the cloud on demand
//!
//! Colors are stored in a local database first; `colorcodex sync` pushes the
//! ones the remote has not confirmed yet.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::list::run_list;
use crate::commands::session::run_session;
use crate::commands::sync::run_sync;
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

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("colorcodex=info,colorcodex_core=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Add {
            code,
            timestamp,
            id,
        }) => {
            let db_path = resolve_db_path(cli.db_path)?;
            run_add(code.as_deref(), timestamp, id, &db_path).await?;
        }
        Some(Commands::List { unsynced, json }) => {
            let db_path = resolve_db_path(cli.db_path)?;
            run_list(unsynced, json, &db_path).await?;
        }
        Some(Commands::Session { unsynced }) => {
            let db_path = resolve_db_path(cli.db_path)?;
            run_session(unsynced, &db_path).await?;
        }
        Some(Commands::Sync { json }) => {
            let db_path = resolve_db_path(cli.db_path)?;
            run_sync(json, &db_path).await?;
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
