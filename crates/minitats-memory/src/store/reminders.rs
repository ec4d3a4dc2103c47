//! Reminder records and their read-modify-write operations.

use super::{Store, REMINDERS_FILE};
use chrono::{DateTime, Utc};
use minitats_core::error::MinitatsError;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// A persisted reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub chat_id: String,
    #[serde(rename = "date")]
    pub due_at: DateTime<Utc>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent: bool,
}

impl Reminder {
    pub fn new(id: &str, chat_id: &str, due_at: DateTime<Utc>, text: &str) -> Self {
        Self {
            id: id.to_string(),
            chat_id: chat_id.to_string(),
            due_at,
            text: text.to_string(),
            created_at: Some(Utc::now()),
            sent: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
        }
    }
}

/// Ids and chat ids were numbers in older documents.
pub(super) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

pub(super) fn strings_or_numbers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<StringOrNumber>::deserialize(deserializer)
        .map(|items| items.into_iter().map(String::from).collect())
}

impl Store {
    /// All reminders. A missing or corrupt document reads as empty.
    pub async fn load_reminders(&self) -> Vec<Reminder> {
        self.read_or_default(REMINDERS_FILE).await
    }

    /// Replace the whole reminder document.
    pub async fn save_reminders(&self, reminders: &[Reminder]) -> Result<(), MinitatsError> {
        let _guard = self.lock().await;
        self.write(REMINDERS_FILE, reminders).await
    }

    pub async fn append_reminder(&self, reminder: Reminder) -> Result<(), MinitatsError> {
        let _guard = self.lock().await;
        let mut all = self.load_reminders().await;
        debug!("storing reminder {} for chat {}", reminder.id, reminder.chat_id);
        all.push(reminder);
        self.write(REMINDERS_FILE, &all).await
    }

    /// Flag a reminder as delivered. Returns false if the id is unknown.
    pub async fn mark_sent(&self, id: &str) -> Result<bool, MinitatsError> {
        let _guard = self.lock().await;
        let mut all = self.load_reminders().await;
        let Some(reminder) = all.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        reminder.sent = true;
        self.write(REMINDERS_FILE, &all).await?;
        Ok(true)
    }

    /// Remove every reminder matching `pred` and return the removed records.
    pub async fn remove_reminders_where<F>(&self, pred: F) -> Result<Vec<Reminder>, MinitatsError>
    where
        F: Fn(&Reminder) -> bool,
    {
        let _guard = self.lock().await;
        let all = self.load_reminders().await;
        let (removed, kept): (Vec<_>, Vec<_>) = all.into_iter().partition(|r| pred(r));
        if !removed.is_empty() {
            self.write(REMINDERS_FILE, &kept).await?;
        }
        Ok(removed)
    }

    /// Unsent reminders of one chat, in insertion order.
    pub async fn pending_for_chat(&self, chat_id: &str) -> Vec<Reminder> {
        self.load_reminders()
            .await
            .into_iter()
            .filter(|r| !r.sent && r.chat_id == chat_id)
            .collect()
    }

    pub async fn unsent_reminders(&self) -> Vec<Reminder> {
        self.load_reminders()
            .await
            .into_iter()
            .filter(|r| !r.sent)
            .collect()
    }
}
