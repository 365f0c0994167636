//! Database connection management

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Database wrapper for the local SQLite note store
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NoteRepository, SqliteNoteRepository};

    #[test]
    fn test_open_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");

        let id = {
            let db = Database::open(&path).unwrap();
            let repo = SqliteNoteRepository::new(db.connection());
            repo.create("Hello", "world").unwrap().id
        };

        let db = Database::open(&path).unwrap();
        let repo = SqliteNoteRepository::new(db.connection());
        let note = repo.get(id).unwrap().unwrap();
        assert_eq!(note.title, "Hello");
    }
}
