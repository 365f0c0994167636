use std::io::Write;
use std::path::Path;

use satchel_core::db::SqliteNoteRepository;
use satchel_core::remote::{HttpRemoteStore, RemoteConfig};
use satchel_core::sync::{CancelToken, SyncEngine};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_sync(db_path: &Path) -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let config = RemoteConfig::from_env()?.ok_or(CliError::SyncNotConfigured)?;
    let remote =
        HttpRemoteStore::new(config).map_err(|error| CliError::SyncFailed(error.to_string()))?;

    let cancel = CancelToken::new();
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();

    // Ctrl-C flips the cooperative flag; the run stops at its next checkpoint
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    // Progress painting happens off the sync task so it never blocks the run
    let painter = tokio::spawn(async move {
        while let Some(percent) = progress_rx.recv().await {
            print!("\rSynchronizing notes... {percent}%");
            let _ = std::io::stdout().flush();
        }
    });

    let db = open_database(db_path)?;
    let repo = SqliteNoteRepository::new(db.connection());
    let engine = SyncEngine::new(remote)
        .with_cancel(cancel)
        .with_progress(progress_tx);

    debug!(db = %db_path.display(), "starting sync run");
    let report = engine.run(&repo).await;
    drop(engine);
    let _ = painter.await;
    println!();

    if report.success {
        debug!("sync run finished");
        println!("Sync completed");
        Ok(())
    } else {
        warn!(message = ?report.message, "sync run failed");
        Err(CliError::SyncFailed(report.message.unwrap_or_else(|| {
            "Unknown error. Try again.".to_string()
        })))
    }
}
