//! Outbound Bot API calls.

use super::types::TgResponse;
use super::TelegramChannel;
use minitats_core::error::MinitatsError;
use tracing::{debug, info, warn};

/// Telegram rejects messages longer than this.
pub(crate) const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a text message to a specific chat, split into chunks if needed.
    ///
    /// Markdown is tried first; a chunk Telegram cannot parse is resent as
    /// plain text. Any other rejection is an error.
    pub(crate) async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), MinitatsError> {
        let url = format!("{}/sendMessage", self.base_url);

        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
                "parse_mode": "Markdown",
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| MinitatsError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if status.is_success() {
                continue;
            }

            let error_text = resp.text().await.unwrap_or_default();
            if !error_text.contains("can't parse entities") {
                return Err(MinitatsError::Channel(format!(
                    "telegram send got {status}: {error_text}"
                )));
            }

            debug!("Markdown parse failed, retrying as plain text");
            let plain_body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            let resp: TgResponse<serde_json::Value> = self
                .client
                .post(&url)
                .json(&plain_body)
                .send()
                .await
                .map_err(|e| MinitatsError::Channel(format!("telegram send (plain) failed: {e}")))?
                .json()
                .await
                .map_err(|e| {
                    MinitatsError::Channel(format!("telegram send (plain) parse failed: {e}"))
                })?;
            if !resp.ok {
                return Err(MinitatsError::Channel(format!(
                    "telegram send (plain) rejected: {}",
                    resp.description.unwrap_or_default()
                )));
            }
        }

        Ok(())
    }

    pub(crate) async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<(), MinitatsError> {
        let url = format!("{}/sendChatAction", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "action": action,
        });

        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MinitatsError::Channel(format!("telegram sendChatAction failed: {e}")))?;

        Ok(())
    }

    /// Publish the command menu shown by Telegram clients.
    pub(crate) async fn register_commands(&self) {
        let commands = command_menu();

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}

pub(crate) fn command_menu() -> serde_json::Value {
    serde_json::json!({
        "commands": [
            { "command": "recordatorio", "description": "Crear un recordatorio: /recordatorio mañana a las 9 llamar al médico" },
            { "command": "misrecordatorios", "description": "Ver tus recordatorios pendientes" },
            { "command": "borrar", "description": "Borrar recordatorios que contengan un texto" },
            { "command": "ayuda", "description": "Cómo usar Minitats" },
        ]
    })
}

/// Split on newline boundaries where possible, never inside a UTF-8 sequence.
pub(crate) fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}
