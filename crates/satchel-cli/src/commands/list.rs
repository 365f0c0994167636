use std::path::Path;

use satchel_core::db::{NoteRepository, SqliteNoteRepository};

use crate::commands::common::{format_note_line, note_to_item, open_database, NoteListItem};
use crate::error::CliError;

pub fn run_list(limit: usize, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let repo = SqliteNoteRepository::new(db.connection());

    let mut notes = repo.list()?;
    notes.truncate(limit);

    if as_json {
        let items = notes.iter().map(note_to_item).collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("No notes yet.");
        return Ok(());
    }

    for note in &notes {
        println!("{}", format_note_line(note));
    }
    Ok(())
}
