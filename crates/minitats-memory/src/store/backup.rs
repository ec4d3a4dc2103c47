//! Boot-time snapshots of the data documents.

use super::{Store, BACKUP_DIR, REMINDERS_FILE, STATUS_FILE, USERS_FILE};
use chrono::Utc;
use minitats_core::error::MinitatsError;
use std::path::PathBuf;
use tracing::{debug, info};

impl Store {
    /// Copy the current documents into `backups/<timestamp>/` and keep only the
    /// newest `keep` snapshots. Returns the snapshot directory, or `None` when
    /// backups are disabled or there is nothing to copy.
    pub async fn backup(&self, keep: usize) -> Result<Option<PathBuf>, MinitatsError> {
        if keep == 0 {
            return Ok(None);
        }

        let _guard = self.lock().await;
        let root = self.path(BACKUP_DIR);
        let snapshot = root.join(Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string());

        let mut copied = 0;
        for file in [REMINDERS_FILE, USERS_FILE, STATUS_FILE] {
            let src = self.path(file);
            if !tokio::fs::try_exists(&src).await.unwrap_or(false) {
                continue;
            }
            if copied == 0 {
                tokio::fs::create_dir_all(&snapshot).await?;
            }
            tokio::fs::copy(&src, snapshot.join(file)).await?;
            copied += 1;
        }

        if copied == 0 {
            debug!("backup skipped: no data documents yet");
            return Ok(None);
        }

        let pruned = prune(&root, keep).await?;
        info!(
            "backup written to {} ({copied} files, {pruned} old snapshots pruned)",
            snapshot.display()
        );
        Ok(Some(snapshot))
    }
}

/// Delete all but the newest `keep` snapshot directories. Names sort by time.
async fn prune(root: &std::path::Path, keep: usize) -> Result<usize, MinitatsError> {
    let mut snapshots = Vec::new();
    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            snapshots.push(entry.path());
        }
    }
    snapshots.sort();

    let excess = snapshots.len().saturating_sub(keep);
    for old in &snapshots[..excess] {
        tokio::fs::remove_dir_all(old).await?;
    }
    Ok(excess)
}
