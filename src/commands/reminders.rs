//! Reminder command handlers: /recordatorio, /misrecordatorios, /borrar.

use crate::i18n;
use crate::reminders::{Created, ReminderError, ReminderManager};
use tracing::error;

pub(super) async fn handle_remind(
    manager: &ReminderManager,
    chat_id: &str,
    arg: &str,
    lang: &str,
) -> String {
    if arg.is_empty() {
        return i18n::t("remind_usage", lang).to_string();
    }
    match manager.create(chat_id, arg).await {
        Ok(Created { reminder, armed }) => {
            let when = i18n::local_datetime(reminder.due_at, manager.tz());
            let reply = i18n::reminder_created(lang, &when, &reminder.text);
            if armed {
                reply
            } else {
                format!("{reply}\n\n{}", i18n::t("not_armed", lang))
            }
        }
        Err(ReminderError::DateNotUnderstood) => i18n::t("date_not_understood", lang).to_string(),
        Err(ReminderError::Storage(e)) => {
            error!("commands: failed to store reminder for chat {chat_id}: {e}");
            i18n::t("storage_error", lang).to_string()
        }
    }
}

pub(super) async fn handle_list(manager: &ReminderManager, chat_id: &str, lang: &str) -> String {
    let pending = manager.list_pending(chat_id).await;
    if pending.is_empty() {
        return i18n::t("no_pending", lang).to_string();
    }
    let tz = manager.tz();
    i18n::pending_list(
        lang,
        pending
            .iter()
            .map(|r| (i18n::local_datetime(r.due_at, tz), r.text.as_str())),
    )
}

pub(super) async fn handle_delete(
    manager: &ReminderManager,
    chat_id: &str,
    arg: &str,
    lang: &str,
) -> String {
    if arg.is_empty() {
        return i18n::t("delete_usage", lang).to_string();
    }
    match manager.delete(chat_id, arg).await {
        Ok(0) => i18n::t("nothing_found", lang).to_string(),
        Ok(n) => i18n::deleted_count(lang, n),
        Err(e) => {
            error!("commands: failed to delete reminders for chat {chat_id}: {e}");
            i18n::t("storage_error", lang).to_string()
        }
    }
}
