use std::io;
use std::path::{Path, PathBuf};

use satchel_core::db::Database;
use satchel_core::{Note, NoteId};
use serde::Serialize;

use crate::error::CliError;

/// Default database location under the platform data directory
pub fn default_db_path() -> Result<PathBuf, CliError> {
    let base = dirs::data_dir().ok_or_else(|| {
        CliError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "no platform data directory",
        ))
    })?;
    Ok(base.join("satchel").join("notes.db"))
}

pub fn resolve_db_path(db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    db_path.map_or_else(default_db_path, Ok)
}

pub fn open_database(db_path: &Path) -> Result<Database, CliError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Database::open(db_path)?)
}

pub fn parse_note_id(raw: &str) -> Result<NoteId, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::InvalidNoteId(raw.to_string()))
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub modified_at: i64,
    pub modified_at_iso: String,
    pub file_name: Option<String>,
    pub folder: Option<String>,
}

pub fn note_to_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.as_i64(),
        title: note.title.clone(),
        body: note.body.clone(),
        modified_at: note.modified_at,
        modified_at_iso: format_timestamp(note.modified_at),
        file_name: note.file_name.clone(),
        folder: note.folder.clone(),
    }
}

pub fn format_note_line(note: &Note) -> String {
    let marker = if note.file_name.is_some() { "" } else { " *" };
    format!(
        "{:>4}  {}  {}{marker}",
        note.id,
        format_timestamp(note.modified_at),
        note.title
    )
}

fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map_or_else(|| "-".to_string(), |date| date.format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note() -> Note {
        Note {
            id: NoteId::new(7),
            title: "Groceries".to_string(),
            body: "milk".to_string(),
            created_at: 0,
            modified_at: 1_282_429_880_000,
            deleted: false,
            file_name: None,
            folder: None,
        }
    }

    #[test]
    fn test_parse_note_id() {
        assert_eq!(parse_note_id(" 42 ").unwrap(), NoteId::new(42));
        assert!(matches!(
            parse_note_id("abc"),
            Err(CliError::InvalidNoteId(_))
        ));
    }

    #[test]
    fn test_format_note_line_marks_unsynced() {
        let line = format_note_line(&note());
        assert!(line.contains("Groceries"));
        assert!(line.ends_with('*'));

        let mut synced = note();
        synced.file_name = Some("Note7.txt".to_string());
        assert!(!format_note_line(&synced).ends_with('*'));
    }

    #[test]
    fn test_note_to_item_carries_sync_fields() {
        let mut synced = note();
        synced.file_name = Some("Note7.txt".to_string());
        synced.folder = Some("/work/".to_string());

        let item = note_to_item(&synced);
        assert_eq!(item.id, 7);
        assert_eq!(item.file_name.as_deref(), Some("Note7.txt"));
        assert_eq!(item.folder.as_deref(), Some("/work/"));
        assert_eq!(item.modified_at_iso, "2010-08-21 22:31");
    }
}
