//! Remote file store interface
//!
//! The sync engine only sees this trait: a hierarchical file store with
//! per-entry modification times and tombstones. The HTTP backend in
//! [`http`] talks to the real service; tests substitute an in-memory fake.

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::{HttpRemoteStore, RemoteConfig};

/// Errors from the remote file store
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Authorization lost; the user must re-link the account
    #[error("remote account is not linked")]
    Unlinked,

    /// Transient network failure
    #[error("network error: {0}")]
    Network(String),

    /// Malformed or unexpected server response
    #[error("malformed server response: {0}")]
    Protocol(String),

    /// The target path does not exist on the server
    #[error("remote path not found: {0}")]
    NotFound(String),

    /// Catch-all for everything else
    #[error("remote error: {0}")]
    Unknown(String),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Metadata for one remote file or folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Full path including folder and file name
    pub path: String,
    pub is_dir: bool,
    /// Server-side tombstone
    pub is_deleted: bool,
    /// Modification time (Unix ms), parsed from the store's native date
    pub modified_at: i64,
    /// Child entries; populated only by a listing call
    pub contents: Vec<RemoteEntry>,
}

impl RemoteEntry {
    /// Last path segment
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Containing folder, with leading and trailing `/`
    #[must_use]
    pub fn parent_folder(&self) -> String {
        self.path
            .rfind('/')
            .map_or_else(|| "/".to_string(), |idx| self.path[..=idx].to_string())
    }
}

/// Operations the sync engine needs from the remote store.
///
/// `put_file_overwrite` must be unconditional (last-writer-wins, no
/// server-side conflict check): the reconciler has already decided the
/// write should win by timestamp comparison.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Entry metadata; with `include_contents` the direct children are
    /// listed in `contents`
    async fn metadata(&self, path: &str, include_contents: bool) -> RemoteResult<RemoteEntry>;

    /// Download file content
    async fn get_file(&self, path: &str) -> RemoteResult<Vec<u8>>;

    /// Create or overwrite a file, returning the server's entry for it
    async fn put_file_overwrite(&self, path: &str, bytes: Vec<u8>) -> RemoteResult<RemoteEntry>;

    /// Delete a file
    async fn delete(&self, path: &str) -> RemoteResult<()>;
}
