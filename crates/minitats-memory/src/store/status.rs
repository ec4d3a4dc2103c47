//! Boot bookkeeping.

use super::{Store, STATUS_FILE};
use chrono::{DateTime, Utc};
use minitats_core::error::MinitatsError;
use serde::{Deserialize, Serialize};

/// Persisted process status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// When the previous process started, if ever.
    #[serde(default)]
    pub last_start: Option<DateTime<Utc>>,
}

impl Store {
    /// Missing or corrupt status reads as "never started".
    pub async fn load_status(&self) -> Status {
        self.read_or_default(STATUS_FILE).await
    }

    pub async fn save_status(&self, status: &Status) -> Result<(), MinitatsError> {
        let _guard = self.lock().await;
        self.write(STATUS_FILE, status).await
    }
}
