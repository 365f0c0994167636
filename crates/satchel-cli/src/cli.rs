use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "satchel")]
#[command(about = "Plain-text notes that sync with your remote file store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Quick capture: satchel "my note title"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note (first line is the title)
    #[command(alias = "new")]
    Add {
        /// Note content
        content: Vec<String>,
    },
    /// List notes, newest first
    List {
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note
    Edit {
        /// Note ID
        id: String,
        /// Replacement title
        #[arg(long)]
        title: Option<String>,
        /// Replacement body
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete a note (removed from the remote on next sync)
    Delete {
        /// Note ID
        id: String,
    },
    /// Synchronize notes with the remote file store
    Sync,
}
