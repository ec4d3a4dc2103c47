//! Message processing pipeline — the main handle_message flow.

use super::Gateway;
use crate::commands::{self, Command, CommandContext};
use minitats_core::{
    context::{persona_prompt, Context},
    message::IncomingMessage,
};
use tracing::{error, info, warn};

impl Gateway {
    /// Process a single incoming message: commands answer directly, anything
    /// else gets a chat reply.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        let preview = if incoming.text.chars().count() > 60 {
            let truncated: String = incoming.text.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            incoming.text.clone()
        };
        info!(
            "[{}] {} says: {}",
            incoming.channel,
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            preview
        );

        let chat_id = incoming.chat_id();
        if let Err(e) = self.store.add_user(chat_id).await {
            error!("failed to register chat {chat_id}: {e}");
        }

        let text = incoming.text.trim();
        if text.is_empty() {
            return;
        }

        let general = &self.config.minitats;
        let reply = match Command::parse(text) {
            Some(cmd) => {
                let ctx = CommandContext {
                    manager: &self.manager,
                    chat_id,
                    text,
                    lang: &general.language,
                    bot_name: &general.name,
                    partner_name: &general.partner_name,
                };
                commands::handle(cmd, &ctx).await
            }
            None => self.chat_reply(chat_id, text).await,
        };

        self.send_text(chat_id, &reply).await;
    }

    /// AI reply when a provider is configured, canned reply otherwise or on failure.
    async fn chat_reply(&self, chat_id: &str, text: &str) -> String {
        let Some(provider) = &self.provider else {
            return self.fallback.pick();
        };

        if let Err(e) = self.channel.send_typing(chat_id).await {
            warn!("typing indicator failed for {chat_id}: {e}");
        }

        let general = &self.config.minitats;
        let mut context = Context::new(text);
        context.system_prompt =
            persona_prompt(&general.name, &general.partner_name, &general.language);

        match provider.complete(&context).await {
            Ok(reply) if !reply.text.trim().is_empty() => reply.text,
            Ok(_) => {
                warn!("provider {} returned an empty reply", provider.name());
                self.fallback.pick()
            }
            Err(e) => {
                warn!("provider {} failed, using canned reply: {e}", provider.name());
                self.fallback.pick()
            }
        }
    }
}
