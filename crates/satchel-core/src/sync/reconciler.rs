//! Per-note sync decisions.
//!
//! [`plan`] is a pure function from one local note plus the remote index to
//! a tagged action, so the decision tree is testable apart from the I/O
//! that executes each action. Conflict policy is last-writer-wins on the
//! modification timestamp; equal timestamps mean pristine, no action.

use std::collections::BTreeMap;

use crate::models::{normalize_folder, Note, NoteId};
use crate::remote::RemoteEntry;

/// Full remote path → entry, built by the scanner before reconciliation
pub type RemoteIndex = BTreeMap<String, RemoteEntry>;

/// What the engine should do for one local note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Local and remote timestamps match; nothing to do
    Skip,
    /// Local is newer; overwrite the existing remote file
    Push { path: String },
    /// Remote is newer; overwrite the local row from remote content
    Pull { path: String },
    /// Tombstoned locally with a known remote counterpart: delete the
    /// remote file now, hard-delete the row after the scan loop
    DeleteRemote { path: String },
    /// Tombstoned locally, never synced: only the deferred row delete
    DeferLocalDelete,
    /// Never synced: create a fresh remote file at this collision-free path
    CreateRemote { path: String },
    /// The note claims a remote counterpart the index doesn't have; warn
    /// and leave the row untouched
    WarnMissing { path: String },
}

/// Decide the action for one note against the remote index
#[must_use]
pub fn plan(note: &Note, index: &RemoteIndex) -> SyncAction {
    if note.deleted {
        return note.file_path().map_or(SyncAction::DeferLocalDelete, |path| {
            SyncAction::DeleteRemote { path }
        });
    }

    match note.file_path() {
        Some(path) => match index.get(&path) {
            Some(entry) => {
                if entry.modified_at > note.modified_at {
                    SyncAction::Pull { path }
                } else if entry.modified_at < note.modified_at {
                    SyncAction::Push { path }
                } else {
                    SyncAction::Skip
                }
            }
            None => SyncAction::WarnMissing { path },
        },
        None => {
            let folder = normalize_folder(note.folder.as_deref());
            SyncAction::CreateRemote {
                path: fresh_remote_path(note.id, &folder, index),
            }
        }
    }
}

/// Generate a collision-free remote path for a never-synced note:
/// `Note{id}.txt` in the note's folder, incrementing the numeric suffix
/// until the candidate is absent from the index.
#[must_use]
pub fn fresh_remote_path(id: NoteId, folder: &str, index: &RemoteIndex) -> String {
    let mut candidate_id = id.as_i64();
    loop {
        let path = format!("{folder}Note{candidate_id}.txt");
        if !index.contains_key(&path) {
            return path;
        }
        candidate_id += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note(id: i64, modified_at: i64, file_name: Option<&str>, deleted: bool) -> Note {
        Note {
            id: NoteId::new(id),
            title: "t".to_string(),
            body: "b".to_string(),
            created_at: 0,
            modified_at,
            deleted,
            file_name: file_name.map(ToString::to_string),
            folder: None,
        }
    }

    fn remote(path: &str, modified_at: i64) -> RemoteEntry {
        RemoteEntry {
            path: path.to_string(),
            is_dir: false,
            is_deleted: false,
            modified_at,
            contents: Vec::new(),
        }
    }

    fn index_of(entries: &[RemoteEntry]) -> RemoteIndex {
        entries
            .iter()
            .map(|entry| (entry.path.clone(), entry.clone()))
            .collect()
    }

    #[test]
    fn test_equal_timestamps_skip_regardless_of_content() {
        let index = index_of(&[remote("/Note1.txt", 500)]);
        let action = plan(&note(1, 500, Some("Note1.txt"), false), &index);
        assert_eq!(action, SyncAction::Skip);
    }

    #[test]
    fn test_remote_newer_pulls() {
        let index = index_of(&[remote("/Note1.txt", 900)]);
        let action = plan(&note(1, 500, Some("Note1.txt"), false), &index);
        assert_eq!(
            action,
            SyncAction::Pull {
                path: "/Note1.txt".to_string()
            }
        );
    }

    #[test]
    fn test_local_newer_pushes() {
        let index = index_of(&[remote("/Note1.txt", 100)]);
        let action = plan(&note(1, 500, Some("Note1.txt"), false), &index);
        assert_eq!(
            action,
            SyncAction::Push {
                path: "/Note1.txt".to_string()
            }
        );
    }

    #[test]
    fn test_missing_remote_counterpart_warns() {
        let action = plan(
            &note(1, 500, Some("Note1.txt"), false),
            &RemoteIndex::new(),
        );
        assert_eq!(
            action,
            SyncAction::WarnMissing {
                path: "/Note1.txt".to_string()
            }
        );
    }

    #[test]
    fn test_deleted_with_file_name_deletes_remote() {
        let action = plan(&note(1, 500, Some("Note1.txt"), true), &RemoteIndex::new());
        assert_eq!(
            action,
            SyncAction::DeleteRemote {
                path: "/Note1.txt".to_string()
            }
        );
    }

    #[test]
    fn test_deleted_without_file_name_only_defers_local_delete() {
        let action = plan(&note(1, 500, None, true), &RemoteIndex::new());
        assert_eq!(action, SyncAction::DeferLocalDelete);
    }

    #[test]
    fn test_blank_file_name_counts_as_never_synced() {
        let action = plan(&note(3, 500, Some("   "), false), &RemoteIndex::new());
        assert_eq!(
            action,
            SyncAction::CreateRemote {
                path: "/Note3.txt".to_string()
            }
        );
    }

    #[test]
    fn test_never_synced_creates_in_note_folder() {
        let mut unsynced = note(7, 500, None, false);
        unsynced.folder = Some("work".to_string());
        let action = plan(&unsynced, &RemoteIndex::new());
        assert_eq!(
            action,
            SyncAction::CreateRemote {
                path: "/work/Note7.txt".to_string()
            }
        );
    }

    #[test]
    fn test_fresh_path_increments_past_collisions() {
        let index = index_of(&[
            remote("/Note5.txt", 1),
            remote("/Note6.txt", 1),
            remote("/Note7.txt", 1),
            remote("/Note8.txt", 1),
            remote("/Note9.txt", 1),
        ]);
        assert_eq!(fresh_remote_path(NoteId::new(5), "/", &index), "/Note10.txt");
    }

    #[test]
    fn test_fresh_path_collisions_scoped_to_folder() {
        let index = index_of(&[remote("/Note5.txt", 1)]);
        assert_eq!(
            fresh_remote_path(NoteId::new(5), "/work/", &index),
            "/work/Note5.txt"
        );
    }
}
