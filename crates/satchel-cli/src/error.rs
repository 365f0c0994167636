use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] satchel_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Invalid note id: {0}")]
    InvalidNoteId(String),
    #[error("Nothing to change; pass --title and/or --body")]
    NothingToEdit,
    #[error(
        "Sync is not configured. Set SATCHEL_REMOTE_URL and SATCHEL_REMOTE_TOKEN (a .env file works too)."
    )]
    SyncNotConfigured,
    #[error("{0}")]
    SyncFailed(String),
}
