//! Known chats, used for restart broadcasts.

use super::{reminders::strings_or_numbers, Store, USERS_FILE};
use minitats_core::error::MinitatsError;
use serde::{Deserialize, Deserializer};
use tracing::info;

#[derive(Default)]
struct UserList(Vec<String>);

impl<'de> Deserialize<'de> for UserList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        strings_or_numbers(deserializer).map(UserList)
    }
}

impl Store {
    /// Every chat that ever talked to the bot, in first-contact order.
    pub async fn load_users(&self) -> Vec<String> {
        self.read_or_default::<UserList>(USERS_FILE).await.0
    }

    /// Record a chat. Returns true when it was not known before.
    pub async fn add_user(&self, chat_id: &str) -> Result<bool, MinitatsError> {
        let _guard = self.lock().await;
        let mut users = self.load_users().await;
        if users.iter().any(|u| u == chat_id) {
            return Ok(false);
        }
        users.push(chat_id.to_string());
        self.write(USERS_FILE, &users).await?;
        info!("new user registered: {chat_id}");
        Ok(true)
    }
}
