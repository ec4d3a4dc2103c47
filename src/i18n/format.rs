//! Format helpers for strings with interpolation.

use super::t;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// `dd/mm/yyyy HH:MM` in the user's time zone.
pub fn local_datetime(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%d/%m/%Y %H:%M").to_string()
}

pub fn reminder_created(lang: &str, when: &str, text: &str) -> String {
    match lang {
        "Spanish" => format!("✅ Te lo recordaré el {when}:\n{text}"),
        _ => format!("✅ I'll remind you on {when}:\n{text}"),
    }
}

pub fn reminder_fired(lang: &str, text: &str) -> String {
    let label = t("reminder_placeholder", lang);
    format!("⏰ {label}: {text}")
}

/// One line per reminder, under a header.
pub fn pending_list<'a, I>(lang: &str, items: I) -> String
where
    I: IntoIterator<Item = (String, &'a str)>,
{
    let mut out = t("pending_header", lang).to_string();
    for (when, text) in items {
        out.push_str(&format!("\n• {when} — {text}"));
    }
    out
}

pub fn deleted_count(lang: &str, n: usize) -> String {
    match (lang, n) {
        ("Spanish", 1) => "🗑️ Borré 1 recordatorio.".to_string(),
        ("Spanish", _) => format!("🗑️ Borré {n} recordatorios."),
        (_, 1) => "🗑️ Deleted 1 reminder.".to_string(),
        _ => format!("🗑️ Deleted {n} reminders."),
    }
}

pub fn welcome(lang: &str, bot_name: &str, partner_name: &str) -> String {
    let greeting = match lang {
        "Spanish" => format!(
            "¡Hola, {partner_name}! Soy *{bot_name}* 💛\nEstoy aquí para acompañarte y recordarte lo que necesites."
        ),
        _ => format!(
            "Hi, {partner_name}! I'm *{bot_name}* 💛\nI'm here to keep you company and remind you of anything you need."
        ),
    };
    format!("{greeting}\n\n{}", t("help_commands", lang))
}

pub fn help(lang: &str, bot_name: &str) -> String {
    let header = match lang {
        "Spanish" => format!("*{bot_name}* — comandos"),
        _ => format!("*{bot_name}* — commands"),
    };
    format!("{header}\n\n{}", t("help_commands", lang))
}

/// One-line boot summary for the admin chat.
pub fn boot_summary(
    lang: &str,
    bot_name: &str,
    is_restart: bool,
    rearmed: usize,
    overdue: usize,
    notified: usize,
) -> String {
    match lang {
        "Spanish" => {
            let kind = if is_restart { "reinicio" } else { "arranque" };
            format!(
                "🤖 {bot_name}: {kind} completado. {rearmed} recordatorios programados, {overdue} vencidos, {notified} avisos enviados."
            )
        }
        _ => {
            let kind = if is_restart { "restart" } else { "start" };
            format!(
                "🤖 {bot_name}: {kind} complete. {rearmed} reminders armed, {overdue} overdue, {notified} notices sent."
            )
        }
    }
}
