//! Satchel CLI - plain-text notes with remote file sync
//!
//! Quick capture from the terminal; `satchel sync` reconciles the local
//! store with the linked remote file store.

mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::CliError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let db_path = commands::common::resolve_db_path(cli.db_path)?;

    match cli.command {
        Some(Commands::Add { content }) => commands::add::run_add(&content, &db_path),
        Some(Commands::List { limit, json }) => commands::list::run_list(limit, json, &db_path),
        Some(Commands::Edit { id, title, body }) => {
            commands::edit::run_edit(&id, title, body, &db_path)
        }
        Some(Commands::Delete { id }) => commands::delete::run_delete(&id, &db_path),
        Some(Commands::Sync) => commands::sync::run_sync(&db_path).await,
        None => commands::add::run_add(&cli.note, &db_path),
    }
}
