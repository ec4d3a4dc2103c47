use super::*;
use crate::testing::manager as setup;

fn ctx<'a>(manager: &'a ReminderManager, chat_id: &'a str, text: &'a str) -> CommandContext<'a> {
    CommandContext {
        manager,
        chat_id,
        text,
        lang: "Spanish",
        bot_name: "Minitats",
        partner_name: "amor",
    }
}

#[test]
fn test_parse_all_commands() {
    assert_eq!(Command::parse("/recordatorio mañana pan"), Some(Command::Remind));
    assert_eq!(Command::parse("/misrecordatorios"), Some(Command::List));
    assert_eq!(Command::parse("/borrar pan"), Some(Command::Delete));
    assert_eq!(Command::parse("/start"), Some(Command::Start));
    assert_eq!(Command::parse("/ayuda"), Some(Command::Help));
    assert_eq!(Command::parse("/help"), Some(Command::Help));
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(Command::parse("/Recordatorio mañana"), Some(Command::Remind));
    assert_eq!(Command::parse("/MISRECORDATORIOS"), Some(Command::List));
    assert_eq!(Command::parse("Borra pan"), Some(Command::Delete));
}

#[test]
fn test_parse_commands_with_botname_suffix() {
    assert_eq!(Command::parse("/ayuda@minitats_bot"), Some(Command::Help));
    assert_eq!(
        Command::parse("/recordatorio@minitats_bot en 10 minutos pan"),
        Some(Command::Remind)
    );
}

#[test]
fn test_parse_natural_language_delete() {
    assert_eq!(Command::parse("borra médico"), Some(Command::Delete));
    assert_eq!(Command::parse("elimina médico"), Some(Command::Delete));
    // Only as the first word.
    assert_eq!(Command::parse("no borra nada"), None);
    assert_eq!(Command::parse("borrador del correo"), None);
}

#[test]
fn test_parse_other_text_passes_through() {
    assert_eq!(Command::parse("hola"), None);
    assert_eq!(Command::parse("/unknown"), None);
    assert_eq!(Command::parse(""), None);
    assert_eq!(Command::parse("   "), None);
}

#[test]
fn test_argument() {
    assert_eq!(argument("/recordatorio  mañana a las 9 pan "), "mañana a las 9 pan");
    assert_eq!(argument("borra médico"), "médico");
    assert_eq!(argument("/misrecordatorios"), "");
    assert_eq!(argument("  /borrar\tpan"), "pan");
}

#[tokio::test]
async fn test_remind_replies_with_local_time_and_text() {
    let (_dir, store, manager, _channel) = setup().await;

    let reply = handle(
        Command::Remind,
        &ctx(&manager, "42", "/recordatorio mañana a las 9 llamar al médico"),
    )
    .await;

    let stored = store.load_reminders().await;
    assert_eq!(stored.len(), 1);
    let when = crate::i18n::local_datetime(stored[0].due_at, manager.tz());
    assert!(when.ends_with("09:00"));
    assert!(reply.contains(&when), "{reply}");
    assert!(reply.contains("llamar al médico"), "{reply}");
}

#[tokio::test]
async fn test_remind_warns_when_time_already_passed() {
    let (_dir, store, manager, _channel) = setup().await;

    let reply = handle(Command::Remind, &ctx(&manager, "42", "/recordatorio hoy comprar pan")).await;

    assert!(reply.contains("comprar pan"), "{reply}");
    assert!(reply.ends_with(i18n::t("not_armed", "Spanish")), "{reply}");
    assert_eq!(store.load_reminders().await.len(), 1);
    assert_eq!(manager.scheduler().armed_count(), 0);
}

#[tokio::test]
async fn test_remind_in_future_has_no_warning() {
    let (_dir, _store, manager, _channel) = setup().await;

    let reply = handle(Command::Remind, &ctx(&manager, "42", "/recordatorio en 1 hora pan")).await;
    assert!(!reply.contains(i18n::t("not_armed", "Spanish")), "{reply}");
}

#[tokio::test]
async fn test_remind_without_argument_shows_usage() {
    let (_dir, store, manager, _channel) = setup().await;

    let reply = handle(Command::Remind, &ctx(&manager, "42", "/recordatorio")).await;
    assert_eq!(reply, i18n::t("remind_usage", "Spanish"));
    assert!(store.load_reminders().await.is_empty());
}

#[tokio::test]
async fn test_remind_without_date() {
    let (_dir, store, manager, _channel) = setup().await;

    let reply = handle(Command::Remind, &ctx(&manager, "42", "/recordatorio comprar pan")).await;
    assert_eq!(reply, i18n::t("date_not_understood", "Spanish"));
    assert!(store.load_reminders().await.is_empty());
}

#[tokio::test]
async fn test_list_empty_and_populated() {
    let (_dir, _store, manager, _channel) = setup().await;

    let reply = handle(Command::List, &ctx(&manager, "42", "/misrecordatorios")).await;
    assert_eq!(reply, i18n::t("no_pending", "Spanish"));

    manager.create("42", "en 2 horas cena").await.unwrap();
    manager.create("42", "en 1 hora comida").await.unwrap();
    manager.create("7", "en 1 hora ajeno").await.unwrap();

    let reply = handle(Command::List, &ctx(&manager, "42", "/misrecordatorios")).await;
    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].ends_with("comida"));
    assert!(lines[2].ends_with("cena"));
    assert!(!reply.contains("ajeno"));
}

#[tokio::test]
async fn test_delete_reports_count_or_not_found() {
    let (_dir, _store, manager, _channel) = setup().await;
    manager.create("42", "en 1 hora llamar al médico").await.unwrap();

    let reply = handle(Command::Delete, &ctx(&manager, "42", "borra dentista")).await;
    assert_eq!(reply, i18n::t("nothing_found", "Spanish"));

    let reply = handle(Command::Delete, &ctx(&manager, "42", "/borrar MÉDICO")).await;
    assert_eq!(reply, i18n::deleted_count("Spanish", 1));
    assert!(manager.list_pending("42").await.is_empty());
}

#[tokio::test]
async fn test_delete_without_argument_shows_usage() {
    let (_dir, _store, manager, _channel) = setup().await;
    let reply = handle(Command::Delete, &ctx(&manager, "42", "/borrar")).await;
    assert_eq!(reply, i18n::t("delete_usage", "Spanish"));
}

#[tokio::test]
async fn test_start_and_help() {
    let (_dir, _store, manager, _channel) = setup().await;

    let reply = handle(Command::Start, &ctx(&manager, "42", "/start")).await;
    assert!(reply.contains("amor"));
    assert!(reply.contains("/recordatorio"));

    let reply = handle(Command::Help, &ctx(&manager, "42", "/ayuda")).await;
    assert!(reply.contains("/misrecordatorios"));
}
