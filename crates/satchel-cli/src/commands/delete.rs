use std::path::Path;

use satchel_core::db::{NoteRepository, SqliteNoteRepository};

use crate::commands::common::{open_database, parse_note_id};
use crate::error::CliError;

pub fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let db = open_database(db_path)?;
    let repo = SqliteNoteRepository::new(db.connection());

    match repo.mark_deleted(note_id) {
        Ok(()) => {
            println!("Deleted note {note_id} (removed from the remote on next sync)");
            Ok(())
        }
        Err(satchel_core::Error::NotFound(_)) => Err(CliError::NoteNotFound(id.to_string())),
        Err(err) => Err(err.into()),
    }
}
