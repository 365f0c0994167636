use std::path::Path;

use satchel_core::db::{NoteRepository, SqliteNoteRepository};

use crate::commands::common::{open_database, parse_note_id};
use crate::error::CliError;

pub fn run_edit(
    id: &str,
    title: Option<String>,
    body: Option<String>,
    db_path: &Path,
) -> Result<(), CliError> {
    if title.is_none() && body.is_none() {
        return Err(CliError::NothingToEdit);
    }

    let note_id = parse_note_id(id)?;
    let db = open_database(db_path)?;
    let repo = SqliteNoteRepository::new(db.connection());

    let note = repo
        .get(note_id)?
        .ok_or_else(|| CliError::NoteNotFound(id.to_string()))?;

    let title = title.unwrap_or(note.title);
    let body = body.unwrap_or(note.body);
    repo.update_content(note_id, &title, &body)?;

    println!("Updated note {note_id}");
    Ok(())
}
