//! Gateway — the main event loop connecting the channel, reminders, and providers.
//!
//! Boot runs backup and recovery, then messages are dispatched one task per
//! message, serialized per chat, until Ctrl-C.

mod pipeline;
pub mod recovery;

#[cfg(test)]
mod tests;

use crate::api::{self, ApiState};
use crate::reminders::ReminderManager;
use chrono::{Duration, Utc};
use minitats_core::{
    config::Config,
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, Provider},
};
use minitats_memory::Store;
use minitats_providers::CannedReplies;
use recovery::RecoveryOptions;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The central gateway that routes messages between the channel and providers.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    /// AI backend; `None` means canned replies only.
    pub(super) provider: Option<Arc<dyn Provider>>,
    pub(super) fallback: CannedReplies,
    pub(super) store: Store,
    pub(super) manager: ReminderManager,
    pub(super) config: Config,
    pub(super) uptime: Instant,
    /// Chats with a message in progress. Later messages wait here, in order.
    pub(super) active_chats: Mutex<HashMap<String, Vec<IncomingMessage>>>,
}

impl Gateway {
    pub fn new(
        channel: Arc<dyn Channel>,
        provider: Option<Arc<dyn Provider>>,
        store: Store,
        manager: ReminderManager,
        config: Config,
    ) -> Self {
        let fallback = CannedReplies::new(&config.minitats.partner_name, &config.minitats.language);
        Self {
            channel,
            provider,
            fallback,
            store,
            manager,
            config,
            uptime: Instant::now(),
            active_chats: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "{} gateway running | channel: {} | provider: {}",
            self.config.minitats.name,
            self.channel.name(),
            self.provider.as_ref().map_or("canned", |p| p.name()),
        );

        self.boot().await;

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;
        info!("Channel started: {}", self.channel.name());

        let api_handle = if self.config.api.enabled {
            let api_cfg = self.config.api.clone();
            let state = ApiState {
                bot_name: self.config.minitats.name.clone(),
                uptime: self.uptime,
                scheduler: self.manager.scheduler().clone(),
            };
            Some(tokio::spawn(async move {
                api::serve(api_cfg, state).await;
            }))
        } else {
            None
        };

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(incoming) = maybe else {
                        warn!("channel closed, stopping gateway");
                        break;
                    };
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch_message(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(api_handle).await;
        Ok(())
    }

    /// Snapshot the data directory, then rebuild timers from the store.
    async fn boot(&self) {
        let keep = self.config.reminders.backup_keep;
        if keep > 0 {
            match self.store.backup(keep).await {
                Ok(Some(path)) => info!("backup written to {}", path.display()),
                Ok(None) => debug!("nothing to back up"),
                Err(e) => error!("backup failed: {e}"),
            }
        }

        let threshold = i64::try_from(self.config.reminders.restart_threshold_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::weeks(52));
        let opts = RecoveryOptions {
            threshold,
            notify_on_restart: self.config.reminders.notify_on_restart,
            admin_id: self.config.minitats.admin_id.as_deref(),
            lang: &self.config.minitats.language,
            bot_name: &self.config.minitats.name,
        };
        recovery::recover(
            &self.store,
            &self.manager,
            self.channel.as_ref(),
            &opts,
            Utc::now(),
        )
        .await;
    }

    /// Dispatch a message: buffer if the chat is busy, otherwise process.
    pub(super) async fn dispatch_message(self: Arc<Self>, incoming: IncomingMessage) {
        let chat_key = incoming.chat_id().to_string();

        {
            let mut active = self.active_chats.lock().await;
            if let Some(buffer) = active.get_mut(&chat_key) {
                debug!("buffered message from chat {chat_key} (one in progress)");
                buffer.push(incoming);
                return;
            }
            active.insert(chat_key.clone(), Vec::new());
        }

        self.process(&chat_key, incoming).await;

        // Drain any buffered messages for this chat.
        loop {
            let next = {
                let mut active = self.active_chats.lock().await;
                match active.get_mut(&chat_key) {
                    Some(buf) if !buf.is_empty() => Some(buf.remove(0)),
                    _ => {
                        active.remove(&chat_key);
                        None
                    }
                }
            };

            match next {
                Some(buffered) => {
                    debug!("processing buffered message from chat {chat_key}");
                    self.process(&chat_key, buffered).await;
                }
                None => break,
            }
        }
    }

    /// Handle one message on its own task so a panic in the handler cannot
    /// leave the chat marked busy forever.
    async fn process(self: &Arc<Self>, chat_key: &str, incoming: IncomingMessage) {
        let gw = Arc::clone(self);
        let handle = tokio::spawn(async move { gw.handle_message(incoming).await });
        if let Err(e) = handle.await {
            error!("handler for chat {chat_key} failed: {e}");
        }
    }

    /// Graceful shutdown: stop the API server and the channel. Armed timers
    /// die with the runtime and are rebuilt at the next boot.
    async fn shutdown(&self, api_handle: Option<JoinHandle<()>>) {
        info!("Shutting down...");

        if let Some(h) = api_handle {
            h.abort();
        }

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }

        info!(
            "Shutdown complete ({} timers dropped).",
            self.manager.scheduler().armed_count()
        );
    }

    /// Send a plain text message to a chat.
    pub(super) async fn send_text(&self, chat_id: &str, text: &str) {
        if let Err(e) = self.channel.send(OutgoingMessage::to(chat_id, text)).await {
            error!("failed to send message to {chat_id}: {e}");
        }
    }
}
