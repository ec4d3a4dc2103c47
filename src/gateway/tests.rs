use super::*;
use crate::i18n;
use crate::testing::{manager as setup, MockChannel};
use async_trait::async_trait;
use minitats_core::{context::Context, error::MinitatsError, message::MessageMetadata};
use std::time::Duration as StdDuration;
use tempfile::TempDir;
use uuid::Uuid;

/// Provider that answers with a fixed text, optionally after a delay, or fails.
struct MockProvider {
    reply: Result<String, String>,
    delay: StdDuration,
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn requires_api_key(&self) -> bool {
        false
    }

    async fn complete(&self, context: &Context) -> Result<OutgoingMessage, MinitatsError> {
        assert!(context.system_prompt.contains("Minitats"));
        tokio::time::sleep(self.delay).await;
        match &self.reply {
            Ok(text) => Ok(OutgoingMessage {
                text: text.clone(),
                metadata: MessageMetadata::default(),
                reply_target: None,
            }),
            Err(e) => Err(MinitatsError::Provider(e.clone())),
        }
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Provider whose completion panics after a delay.
struct PanickingProvider(StdDuration);

#[async_trait]
impl Provider for PanickingProvider {
    fn name(&self) -> &str {
        "panicking"
    }

    fn requires_api_key(&self) -> bool {
        false
    }

    async fn complete(&self, _context: &Context) -> Result<OutgoingMessage, MinitatsError> {
        tokio::time::sleep(self.0).await;
        panic!("provider blew up");
    }

    async fn is_available(&self) -> bool {
        true
    }
}

fn provider(reply: Result<&str, &str>, delay_ms: u64) -> Option<Arc<dyn Provider>> {
    Some(Arc::new(MockProvider {
        reply: reply.map(str::to_string).map_err(str::to_string),
        delay: StdDuration::from_millis(delay_ms),
    }))
}

async fn gateway(provider: Option<Arc<dyn Provider>>) -> (TempDir, Arc<Gateway>, Arc<MockChannel>) {
    let (dir, store, manager, channel) = setup().await;
    let gw = Gateway::new(channel.clone(), provider, store, manager, Config::default());
    (dir, Arc::new(gw), channel)
}

fn incoming(chat: &str, text: &str) -> IncomingMessage {
    IncomingMessage {
        id: Uuid::new_v4(),
        channel: "mock".into(),
        sender_id: chat.into(),
        sender_name: Some("Ana".into()),
        text: text.into(),
        timestamp: Utc::now(),
        reply_target: Some(chat.into()),
    }
}

#[tokio::test]
async fn test_command_is_answered_and_chat_registered() {
    let (_dir, gw, channel) = gateway(None).await;

    gw.handle_message(incoming("42", "/misrecordatorios")).await;

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, i18n::t("no_pending", "Spanish"));
    assert_eq!(sent[0].reply_target.as_deref(), Some("42"));
    assert_eq!(gw.store.load_users().await, vec!["42".to_string()]);
}

#[tokio::test]
async fn test_reminder_command_creates_reminder() {
    let (_dir, gw, channel) = gateway(None).await;

    gw.handle_message(incoming("42", "/recordatorio en 1 hora regar las plantas"))
        .await;

    let pending = gw.manager.list_pending("42").await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].text, "regar las plantas");
    assert!(channel.sent()[0].text.contains("regar las plantas"));
}

#[tokio::test]
async fn test_natural_language_delete() {
    let (_dir, gw, channel) = gateway(None).await;
    gw.manager.create("42", "en 1 hora llamar al médico").await.unwrap();

    gw.handle_message(incoming("42", "borra médico")).await;

    assert!(gw.manager.list_pending("42").await.is_empty());
    assert_eq!(channel.sent()[0].text, i18n::deleted_count("Spanish", 1));
}

#[tokio::test]
async fn test_chat_without_provider_uses_canned_reply() {
    let (_dir, gw, channel) = gateway(None).await;

    gw.handle_message(incoming("42", "hola")).await;

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("amor"), "{}", sent[0].text);
}

#[tokio::test]
async fn test_chat_uses_provider_reply() {
    let (_dir, gw, channel) = gateway(provider(Ok("¡Hola, cariño!"), 0)).await;

    gw.handle_message(incoming("42", "hola")).await;

    assert_eq!(channel.sent()[0].text, "¡Hola, cariño!");
}

#[tokio::test]
async fn test_provider_failure_falls_back_to_canned() {
    let (_dir, gw, channel) = gateway(provider(Err("rate limited"), 0)).await;

    gw.handle_message(incoming("42", "hola")).await;

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("amor"));
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let (_dir, gw, channel) = gateway(None).await;
    gw.handle_message(incoming("42", "   ")).await;
    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn test_busy_chat_buffers_message() {
    let (_dir, gw, channel) = gateway(None).await;
    gw.active_chats
        .lock()
        .await
        .insert("42".to_string(), Vec::new());

    gw.clone().dispatch_message(incoming("42", "hola")).await;

    assert!(channel.sent().is_empty());
    assert_eq!(gw.active_chats.lock().await["42"].len(), 1);
}

#[tokio::test]
async fn test_messages_of_one_chat_are_handled_in_order() {
    let (_dir, gw, channel) = gateway(provider(Ok("primera"), 100)).await;

    let first = tokio::spawn(gw.clone().dispatch_message(incoming("42", "hola")));
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    gw.clone()
        .dispatch_message(incoming("42", "/misrecordatorios"))
        .await;
    gw.clone().dispatch_message(incoming("42", "/ayuda")).await;
    first.await.unwrap();

    let texts: Vec<String> = channel.sent().into_iter().map(|m| m.text).collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], "primera");
    assert_eq!(texts[1], i18n::t("no_pending", "Spanish"));
    assert!(texts[2].contains("/misrecordatorios"));
    assert!(gw.active_chats.lock().await.is_empty());
}

#[tokio::test]
async fn test_panicking_handler_releases_chat() {
    let (_dir, gw, channel) = gateway(Some(Arc::new(PanickingProvider(StdDuration::ZERO)))).await;

    gw.clone().dispatch_message(incoming("42", "hola")).await;
    assert!(gw.active_chats.lock().await.is_empty());

    gw.clone()
        .dispatch_message(incoming("42", "/misrecordatorios"))
        .await;
    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, i18n::t("no_pending", "Spanish"));
}

#[tokio::test]
async fn test_buffered_messages_survive_a_panicking_handler() {
    let (_dir, gw, channel) =
        gateway(Some(Arc::new(PanickingProvider(StdDuration::from_millis(100))))).await;

    let first = tokio::spawn(gw.clone().dispatch_message(incoming("42", "hola")));
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    gw.clone()
        .dispatch_message(incoming("42", "/misrecordatorios"))
        .await;
    first.await.unwrap();

    let texts: Vec<String> = channel.sent().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec![i18n::t("no_pending", "Spanish").to_string()]);
    assert!(gw.active_chats.lock().await.is_empty());
}

#[tokio::test]
async fn test_reminder_far_beyond_calendar_is_rejected() {
    let (_dir, gw, channel) = gateway(None).await;

    gw.clone()
        .dispatch_message(incoming("42", "/recordatorio en 99999999 días pan"))
        .await;

    assert_eq!(channel.sent()[0].text, i18n::t("date_not_understood", "Spanish"));
    assert!(gw.manager.list_pending("42").await.is_empty());
    assert!(gw.active_chats.lock().await.is_empty());
}
