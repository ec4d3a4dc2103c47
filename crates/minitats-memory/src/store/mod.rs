//! JSON-document store.
//!
//! Split into focused submodules:
//! - `reminders` — reminder records, queries and the sent flag
//! - `users` — the broadcast list of known chats
//! - `status` — last boot time
//! - `backup` — boot-time snapshots of the data documents
//!
//! Every document is rewritten whole through a temp file and a rename, and
//! every read-modify-write cycle holds the store's writer lock.

mod backup;
mod reminders;
mod status;
mod users;


pub use reminders::Reminder;
pub use status::Status;

use chrono::Utc;
use minitats_core::error::MinitatsError;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

pub const REMINDERS_FILE: &str = "reminders.json";
pub const USERS_FILE: &str = "users.json";
pub const STATUS_FILE: &str = "status.json";
pub const BACKUP_DIR: &str = "backups";

/// Durable store rooted at a data directory. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    dir: PathBuf,
    writer: Mutex<()>,
    last_id: AtomicI64,
}

impl Store {
    /// Open (and create if needed) the data directory.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, MinitatsError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            MinitatsError::Storage(format!("failed to create data dir {}: {e}", dir.display()))
        })?;

        info!("Store initialized at {}", dir.display());

        Ok(Self {
            inner: Arc::new(Inner {
                dir,
                writer: Mutex::new(()),
                last_id: AtomicI64::new(0),
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.inner.dir.join(file)
    }

    /// Hold this across a load → mutate → save cycle.
    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.writer.lock().await
    }

    /// Next reminder id: the current Unix time in milliseconds, bumped past the
    /// last id handed out so two reminders created in the same millisecond
    /// still get distinct ids.
    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .inner
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1).to_string()
    }

    /// Read a JSON document, falling back to `T::default()` when the file is
    /// missing or unreadable.
    async fn read_or_default<T>(&self, file: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(file);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!("failed to read {}: {e}; using empty document", path.display());
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("corrupt {}: {e}; using empty document", path.display());
                T::default()
            }
        }
    }

    /// Write a JSON document atomically: `<file>.tmp` then rename.
    async fn write<T>(&self, file: &str, value: &T) -> Result<(), MinitatsError>
    where
        T: Serialize + ?Sized,
    {
        let path = self.path(file);
        let tmp = self.path(&format!("{file}.tmp"));
        let body = serde_json::to_string_pretty(value)?;

        tokio::fs::write(&tmp, body).await.map_err(|e| {
            MinitatsError::Storage(format!("failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            MinitatsError::Storage(format!("failed to replace {}: {e}", path.display()))
        })?;
        Ok(())
    }
}
