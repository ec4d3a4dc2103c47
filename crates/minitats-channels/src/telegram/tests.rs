use super::polling::{parse_chat_id, to_incoming};
use super::send::{command_menu, split_message, MAX_MESSAGE_LEN};
use super::types::{TgMessage, TgResponse, TgUpdate};
use super::TelegramChannel;
use minitats_core::config::TelegramConfig;
use minitats_core::traits::Channel;

fn message(json: &str) -> TgMessage {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_split_short_message() {
    let chunks = split_message("hola", MAX_MESSAGE_LEN);
    assert_eq!(chunks, vec!["hola"]);
}

#[test]
fn test_split_long_message() {
    let text = "a\n".repeat(3000);
    let chunks = split_message(&text, MAX_MESSAGE_LEN);
    assert!(chunks.len() >= 2);
    for chunk in &chunks {
        assert!(chunk.len() <= MAX_MESSAGE_LEN);
    }
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_respects_char_boundaries() {
    let text = "ñ".repeat(3000);
    let chunks = split_message(&text, MAX_MESSAGE_LEN);
    assert!(chunks.len() >= 2);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_text_message_becomes_incoming() {
    let msg = message(
        r#"{
            "message_id": 1,
            "date": 1767258000,
            "from": {"id": 42, "first_name": "Ana", "username": "ana"},
            "chat": {"id": -100, "type": "group"},
            "text": "/recordatorio mañana a las 9 pan"
        }"#,
    );
    let incoming = to_incoming(msg, &[]).unwrap();
    assert_eq!(incoming.channel, "telegram");
    assert_eq!(incoming.sender_id, "42");
    assert_eq!(incoming.sender_name.as_deref(), Some("@ana"));
    assert_eq!(incoming.chat_id(), "-100");
    assert_eq!(incoming.timestamp.timestamp(), 1767258000);
}

#[test]
fn test_sender_name_without_username() {
    let msg = message(
        r#"{"from": {"id": 1, "first_name": "Ana", "last_name": "García"},
            "chat": {"id": 1}, "text": "hola"}"#,
    );
    let incoming = to_incoming(msg, &[]).unwrap();
    assert_eq!(incoming.sender_name.as_deref(), Some("Ana García"));
}

#[test]
fn test_non_text_message_is_dropped() {
    let msg = message(
        r#"{"from": {"id": 1, "first_name": "Ana"},
            "chat": {"id": 1}, "sticker": {"file_id": "x"}}"#,
    );
    assert!(to_incoming(msg, &[]).is_none());
}

#[test]
fn test_allow_list() {
    let json = r#"{"from": {"id": 7, "first_name": "Ana"}, "chat": {"id": 7}, "text": "hola"}"#;
    assert!(to_incoming(message(json), &[1, 2]).is_none());
    assert!(to_incoming(message(json), &[7]).is_some());
}

#[test]
fn test_update_batch_parses() {
    let body: TgResponse<Vec<TgUpdate>> = serde_json::from_str(
        r#"{"ok": true, "result": [
            {"update_id": 10, "message": {"chat": {"id": 1}, "text": "hola"}},
            {"update_id": 11, "edited_message": {"chat": {"id": 1}, "text": "x"}}
        ]}"#,
    )
    .unwrap();
    let updates = body.result.unwrap();
    assert_eq!(updates.len(), 2);
    assert!(updates[0].message.is_some());
    assert!(updates[1].message.is_none());
}

#[test]
fn test_parse_chat_id() {
    assert_eq!(parse_chat_id("-100123").unwrap(), -100123);
    assert!(parse_chat_id("abc").is_err());
}

#[test]
fn test_command_menu_lists_reminder_commands() {
    let menu = command_menu();
    let names: Vec<&str> = menu["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["command"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"recordatorio"));
    assert!(names.contains(&"misrecordatorios"));
    assert!(names.contains(&"borrar"));
}

#[tokio::test]
async fn test_send_without_target_is_error() {
    let channel = TelegramChannel::new(TelegramConfig::default());
    let err = channel
        .send(minitats_core::message::OutgoingMessage::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("reply_target"));
}
