//! Bidirectional note synchronization.
//!
//! One run: scan the remote tree into an index, snapshot the local rows,
//! reconcile each note against the index (push, pull, delete, or skip,
//! last-writer-wins by timestamp), apply deferred row deletes, then
//! materialize remote files that have no local counterpart. Runs on one
//! dedicated background task; remote calls are strictly sequential.

pub mod content;
pub mod reconciler;
pub mod scanner;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::db::NoteRepository;
use crate::models::{normalize_folder, Note, NoteId};
use crate::remote::{RemoteEntry, RemoteError, RemoteStore};
use self::reconciler::{plan, RemoteIndex, SyncAction};

/// Root of the synced remote subtree
pub const SYNC_ROOT: &str = "/";

/// Terminal failure of a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("local note store is unavailable: {0}")]
    LocalStore(#[from] crate::Error),

    #[error("sync canceled")]
    Canceled,
}

impl SyncError {
    /// The single short message surfaced to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote(RemoteError::Unlinked) => "Please link the remote account.".to_string(),
            Self::Remote(RemoteError::Network(_)) => "Network error. Try again.".to_string(),
            Self::Remote(RemoteError::Protocol(_)) => "Remote error. Try again.".to_string(),
            Self::Remote(RemoteError::NotFound(_) | RemoteError::Unknown(_)) => {
                "Unknown error. Try again.".to_string()
            }
            Self::LocalStore(_) => "Could not read local notes.".to_string(),
            Self::Canceled => "Canceled".to_string(),
        }
    }
}

/// Outcome of a sync run, consumed by the caller's result surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub success: bool,
    pub message: Option<String>,
}

/// Cooperative cancellation flag, polled once per loop iteration.
/// Does not interrupt an in-flight network call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fire-and-forget percent progress channel; sends never block the worker
pub type ProgressSender = mpsc::UnboundedSender<u8>;

/// The sync orchestrator
pub struct SyncEngine<R> {
    remote: R,
    cancel: CancelToken,
    progress: Option<ProgressSender>,
}

impl<R: RemoteStore> SyncEngine<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            cancel: CancelToken::new(),
            progress: None,
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run one full sync, converting the terminal status into the single
    /// outward-facing result. Partial progress is never rolled back; a
    /// failed run is corrected by the next successful one.
    pub async fn run(&self, repo: &dyn NoteRepository) -> SyncReport {
        match self.run_inner(repo).await {
            Ok(()) => {
                debug!("sync completed");
                SyncReport {
                    success: true,
                    message: None,
                }
            }
            Err(err) => {
                error!("sync failed: {err}");
                SyncReport {
                    success: false,
                    message: Some(err.user_message()),
                }
            }
        }
    }

    async fn run_inner(&self, repo: &dyn NoteRepository) -> Result<(), SyncError> {
        let mut index = scanner::scan(&self.remote, SYNC_ROOT).await?;
        let notes = repo.read_all()?;
        let total = notes.len();

        let mut synced_paths: HashSet<String> = HashSet::new();
        let mut deferred_deletes: Vec<NoteId> = Vec::new();

        for (pos, note) in notes.iter().enumerate() {
            if self.cancel.is_canceled() {
                return Err(SyncError::Canceled);
            }
            // Recorded up front, tombstoned rows included, so the pull-down
            // phase never re-materializes a file the local side already
            // accounts for.
            if let Some(path) = note.file_path() {
                synced_paths.insert(path);
            }
            self.apply(repo, note, &mut index, &mut synced_paths, &mut deferred_deletes)
                .await?;
            self.report_progress(pos + 1, total);
        }

        // Row deletes were deferred so the loop above never mutates the
        // snapshot it iterates.
        for id in deferred_deletes {
            repo.delete_row(id)?;
        }

        self.pull_down(repo, &index, &synced_paths).await
    }

    async fn apply(
        &self,
        repo: &dyn NoteRepository,
        note: &Note,
        index: &mut RemoteIndex,
        synced_paths: &mut HashSet<String>,
        deferred_deletes: &mut Vec<NoteId>,
    ) -> Result<(), SyncError> {
        match plan(note, index) {
            SyncAction::Skip => {}
            SyncAction::WarnMissing { path } => {
                warn!(note_id = %note.id, path = %path, "remote file is missing; leaving local note untouched");
            }
            SyncAction::DeferLocalDelete => deferred_deletes.push(note.id),
            SyncAction::DeleteRemote { path } => {
                match self.remote.delete(&path).await {
                    Ok(()) => {}
                    // Already gone remotely counts as deleted
                    Err(RemoteError::NotFound(_)) => {
                        debug!(path = %path, "remote file already absent");
                    }
                    Err(err) => return Err(err.into()),
                }
                deferred_deletes.push(note.id);
            }
            SyncAction::Pull { path } => {
                let entry = index
                    .get(&path)
                    .cloned()
                    .ok_or_else(|| RemoteError::NotFound(path.clone()))?;
                match self.pull_note(repo, note.id, &entry).await {
                    Ok(()) => {}
                    Err(SyncError::Remote(RemoteError::NotFound(_))) => {
                        self.create_fresh(repo, note, index, synced_paths).await?;
                    }
                    Err(err) => return Err(err),
                }
            }
            SyncAction::Push { path } => match self.push_note(repo, note, &path).await {
                Ok(()) => {}
                Err(SyncError::Remote(RemoteError::NotFound(_))) => {
                    self.create_fresh(repo, note, index, synced_paths).await?;
                }
                Err(err) => return Err(err),
            },
            SyncAction::CreateRemote { path } => {
                self.create_at(repo, note, path, index, synced_paths).await?;
            }
        }
        Ok(())
    }

    /// Download remote content into an existing row, taking the remote
    /// timestamp and path metadata verbatim
    async fn pull_note(
        &self,
        repo: &dyn NoteRepository,
        id: NoteId,
        entry: &RemoteEntry,
    ) -> Result<(), SyncError> {
        let bytes = self.remote.get_file(&entry.path).await?;
        let (title, body) = content::decode(&bytes);
        repo.overwrite_from_remote(
            id,
            &title,
            &body,
            entry.modified_at,
            entry.file_name(),
            &entry.parent_folder(),
        )?;
        Ok(())
    }

    /// Overwrite the existing remote file and record the server's entry
    /// metadata locally
    async fn push_note(
        &self,
        repo: &dyn NoteRepository,
        note: &Note,
        path: &str,
    ) -> Result<(), SyncError> {
        let bytes = content::encode(&note.title, &note.body);
        let entry = self.remote.put_file_overwrite(path, bytes).await?;
        repo.update_sync_metadata(
            note.id,
            entry.modified_at,
            entry.file_name(),
            &entry.parent_folder(),
        )?;
        Ok(())
    }

    /// Not-found recovery: the remote counterpart vanished mid-run, so the
    /// note is pushed again as a brand-new file
    async fn create_fresh(
        &self,
        repo: &dyn NoteRepository,
        note: &Note,
        index: &mut RemoteIndex,
        synced_paths: &mut HashSet<String>,
    ) -> Result<(), SyncError> {
        let folder = normalize_folder(note.folder.as_deref());
        let path = reconciler::fresh_remote_path(note.id, &folder, index);
        self.create_at(repo, note, path, index, synced_paths).await
    }

    async fn create_at(
        &self,
        repo: &dyn NoteRepository,
        note: &Note,
        path: String,
        index: &mut RemoteIndex,
        synced_paths: &mut HashSet<String>,
    ) -> Result<(), SyncError> {
        let bytes = content::encode(&note.title, &note.body);
        let entry = self.remote.put_file_overwrite(&path, bytes).await?;
        repo.update_sync_metadata(
            note.id,
            entry.modified_at,
            entry.file_name(),
            &entry.parent_folder(),
        )?;
        // Fresh files join the index and the synced set: later creates in
        // the same run cannot collide with them, and pull-down will not
        // re-download them.
        synced_paths.insert(entry.path.clone());
        index.insert(entry.path.clone(), entry);
        Ok(())
    }

    /// Materialize every indexed remote file the local scan never touched
    async fn pull_down(
        &self,
        repo: &dyn NoteRepository,
        index: &RemoteIndex,
        synced_paths: &HashSet<String>,
    ) -> Result<(), SyncError> {
        for (path, entry) in index {
            if self.cancel.is_canceled() {
                return Err(SyncError::Canceled);
            }
            if synced_paths.contains(path) {
                continue;
            }
            let id = repo.insert_blank()?;
            self.pull_note(repo, id, entry).await?;
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn report_progress(&self, processed: usize, total: usize) {
        let Some(progress) = &self.progress else {
            return;
        };
        if total == 0 {
            return;
        }
        let percent = (100.0 * processed as f64 / total as f64 + 0.5) as u8;
        let _ = progress.send(percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cancel_token_observed_through_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_canceled());
        token.cancel();
        assert!(observer.is_canceled());
    }

    #[test]
    fn test_user_messages_per_error_category() {
        assert_eq!(
            SyncError::Remote(RemoteError::Unlinked).user_message(),
            "Please link the remote account."
        );
        assert_eq!(
            SyncError::Remote(RemoteError::Network("timeout".into())).user_message(),
            "Network error. Try again."
        );
        assert_eq!(
            SyncError::Remote(RemoteError::Protocol("bad json".into())).user_message(),
            "Remote error. Try again."
        );
        assert_eq!(
            SyncError::Remote(RemoteError::Unknown("???".into())).user_message(),
            "Unknown error. Try again."
        );
        assert_eq!(SyncError::Canceled.user_message(), "Canceled");
    }
}
