//! Note repository implementation

use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for note storage operations.
///
/// Covers both the user-facing operations (create, list, edit, tombstone)
/// and the row-level operations the sync engine drives (snapshot read,
/// blank insert, remote overwrite, metadata bookkeeping, hard delete).
pub trait NoteRepository {
    /// Create a new note
    fn create(&self, title: &str, body: &str) -> Result<Note>;

    /// Get a note by ID (tombstoned notes are not returned)
    fn get(&self, id: NoteId) -> Result<Option<Note>>;

    /// List notes (excluding tombstones), newest first
    fn list(&self) -> Result<Vec<Note>>;

    /// Snapshot every row, tombstones included, in natural row order
    fn read_all(&self) -> Result<Vec<Note>>;

    /// Insert an empty row and return its id
    fn insert_blank(&self) -> Result<NoteId>;

    /// Update a note's content, bumping its modification time
    fn update_content(&self, id: NoteId, title: &str, body: &str) -> Result<()>;

    /// Overwrite a row from remote content, taking the remote timestamp
    /// verbatim (does not bump the local clock)
    fn overwrite_from_remote(
        &self,
        id: NoteId,
        title: &str,
        body: &str,
        modified_at: i64,
        file_name: &str,
        folder: &str,
    ) -> Result<()>;

    /// Record the server-assigned metadata after a push
    fn update_sync_metadata(
        &self,
        id: NoteId,
        modified_at: i64,
        file_name: &str,
        folder: &str,
    ) -> Result<()>;

    /// Tombstone a note; it stays in storage until sync removes it
    fn mark_deleted(&self, id: NoteId) -> Result<()>;

    /// Hard-delete a row (deferred sync delete)
    fn delete_row(&self, id: NoteId) -> Result<()>;
}

/// `SQLite` implementation of `NoteRepository`
pub struct SqliteNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
        Ok(Note {
            id: NoteId::new(row.get(0)?),
            title: row.get(1)?,
            body: row.get(2)?,
            created_at: row.get(3)?,
            modified_at: row.get(4)?,
            deleted: row.get::<_, i32>(5)? != 0,
            file_name: row.get(6)?,
            folder: row.get(7)?,
        })
    }
}

const NOTE_COLUMNS: &str = "id, title, body, created_at, modified_at, deleted, file_name, folder";

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create(&self, title: &str, body: &str) -> Result<Note> {
        let now = chrono::Utc::now().timestamp_millis();

        self.conn.execute(
            "INSERT INTO notes (title, body, created_at, modified_at) VALUES (?, ?, ?, ?)",
            params![title, body, now, now],
        )?;
        let id = NoteId::new(self.conn.last_insert_rowid());

        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn get(&self, id: NoteId) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ? AND deleted = 0"),
                params![id.as_i64()],
                Self::parse_note,
            )
            .optional()?;

        Ok(note)
    }

    fn list(&self) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE deleted = 0 ORDER BY modified_at DESC"
        ))?;

        let notes = stmt
            .query_map([], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    fn read_all(&self) -> Result<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id"))?;

        let notes = stmt
            .query_map([], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    fn insert_blank(&self) -> Result<NoteId> {
        let now = chrono::Utc::now().timestamp_millis();

        self.conn.execute(
            "INSERT INTO notes (title, body, created_at, modified_at) VALUES ('', '', ?, ?)",
            params![now, now],
        )?;

        Ok(NoteId::new(self.conn.last_insert_rowid()))
    }

    fn update_content(&self, id: NoteId, title: &str, body: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();

        let rows = self.conn.execute(
            "UPDATE notes SET title = ?, body = ?, modified_at = ? WHERE id = ? AND deleted = 0",
            params![title, body, now, id.as_i64()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn overwrite_from_remote(
        &self,
        id: NoteId,
        title: &str,
        body: &str,
        modified_at: i64,
        file_name: &str,
        folder: &str,
    ) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE notes SET title = ?, body = ?, modified_at = ?, file_name = ?, folder = ?
             WHERE id = ?",
            params![title, body, modified_at, file_name, folder, id.as_i64()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn update_sync_metadata(
        &self,
        id: NoteId,
        modified_at: i64,
        file_name: &str,
        folder: &str,
    ) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE notes SET modified_at = ?, file_name = ?, folder = ? WHERE id = ?",
            params![modified_at, file_name, folder, id.as_i64()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn mark_deleted(&self, id: NoteId) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE notes SET deleted = 1 WHERE id = ? AND deleted = 0",
            params![id.as_i64()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn delete_row(&self, id: NoteId) -> Result<()> {
        self.conn
            .execute("DELETE FROM notes WHERE id = ?", params![id.as_i64()])?;

        Ok(())
    }
}
