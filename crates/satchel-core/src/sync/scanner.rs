//! Remote tree scanner.
//!
//! Walks the remote folder hierarchy with an explicit work stack (no
//! recursion, so arbitrarily deep nesting is fine) and flattens it into
//! the path-keyed [`RemoteIndex`]. Tombstoned entries are skipped,
//! directories are descended into but kept out of the index. The index is
//! fully built before reconciliation starts.

use super::reconciler::RemoteIndex;
use crate::remote::{RemoteResult, RemoteStore};

/// Build the full remote index rooted at `root`
pub async fn scan<R: RemoteStore + ?Sized>(store: &R, root: &str) -> RemoteResult<RemoteIndex> {
    let mut index = RemoteIndex::new();
    let mut pending = vec![root.to_string()];

    while let Some(dir) = pending.pop() {
        let listing = store.metadata(&dir, true).await?;
        for entry in listing.contents {
            if entry.is_deleted {
                continue;
            }
            if entry.is_dir {
                pending.push(entry.path.clone());
            } else {
                index.insert(entry.path.clone(), entry);
            }
        }
    }

    Ok(index)
}
