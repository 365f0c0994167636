//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// A unique identifier for a note: the stable integer row id assigned by the
/// local store. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(i64);

impl NoteId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for NoteId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A note in the local store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// First line of the remote file
    pub title: String,
    /// Remaining content, may contain newlines
    pub body: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last modification timestamp (Unix ms); advances on every
    /// content-affecting write and is the sync comparison key
    pub modified_at: i64,
    /// Soft delete flag; a tombstoned note stays in storage until sync
    /// removes it on both sides
    pub deleted: bool,
    /// Remote file name; `None` means never yet synced
    pub file_name: Option<String>,
    /// Remote folder; `None` or empty means the remote root
    pub folder: Option<String>,
}

impl Note {
    /// The trimmed remote file name, or `None` when the note has never been
    /// synced (empty-after-trim counts as absent).
    #[must_use]
    pub fn remote_file_name(&self) -> Option<&str> {
        self.file_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Full remote path for this note: normalized folder plus file name.
    /// This is the join key against the remote index.
    #[must_use]
    pub fn file_path(&self) -> Option<String> {
        let name = self.remote_file_name()?;
        Some(format!(
            "{}{name}",
            normalize_folder(self.folder.as_deref())
        ))
    }
}

/// Normalize a folder to start and end with `/`. Empty, missing, or `/`
/// all mean the remote root.
#[must_use]
pub fn normalize_folder(folder: Option<&str>) -> String {
    let trimmed = folder.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() || trimmed == "/" {
        return "/".to_string();
    }

    let mut out = String::with_capacity(trimmed.len() + 2);
    if !trimmed.starts_with('/') {
        out.push('/');
    }
    out.push_str(trimmed);
    if !out.ends_with('/') {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(file_name: Option<&str>, folder: Option<&str>) -> Note {
        Note {
            id: NoteId::new(1),
            title: "title".to_string(),
            body: "body".to_string(),
            created_at: 0,
            modified_at: 0,
            deleted: false,
            file_name: file_name.map(ToString::to_string),
            folder: folder.map(ToString::to_string),
        }
    }

    #[test]
    fn test_note_id_parse() {
        let id: NoteId = "42".parse().unwrap();
        assert_eq!(id, NoteId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_normalize_folder_root_forms() {
        assert_eq!(normalize_folder(None), "/");
        assert_eq!(normalize_folder(Some("")), "/");
        assert_eq!(normalize_folder(Some("  ")), "/");
        assert_eq!(normalize_folder(Some("/")), "/");
    }

    #[test]
    fn test_normalize_folder_adds_slashes() {
        assert_eq!(normalize_folder(Some("work")), "/work/");
        assert_eq!(normalize_folder(Some("/work")), "/work/");
        assert_eq!(normalize_folder(Some("work/")), "/work/");
        assert_eq!(normalize_folder(Some("/a/b/")), "/a/b/");
    }

    #[test]
    fn test_file_path_joins_folder_and_name() {
        assert_eq!(
            note(Some("Note1.txt"), None).file_path().as_deref(),
            Some("/Note1.txt")
        );
        assert_eq!(
            note(Some("Note1.txt"), Some("work")).file_path().as_deref(),
            Some("/work/Note1.txt")
        );
    }

    #[test]
    fn test_file_path_absent_for_unsynced_notes() {
        assert_eq!(note(None, None).file_path(), None);
        assert_eq!(note(Some("   "), Some("work")).file_path(), None);
    }
}
