//! Built-in bot commands — instant responses, no provider call.

mod reminders;

#[cfg(test)]
mod tests;

use crate::i18n;
use crate::reminders::ReminderManager;

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub manager: &'a ReminderManager,
    pub chat_id: &'a str,
    pub text: &'a str,
    pub lang: &'a str,
    pub bot_name: &'a str,
    pub partner_name: &'a str,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Remind,
    List,
    Delete,
    Start,
    Help,
}

impl Command {
    /// Parse a command from message text. Returns `None` for anything else,
    /// including unknown `/` prefixes (which pass through to the provider).
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?.to_lowercase();
        // Strip @botname suffix (e.g. "/ayuda@minitats_bot" → "/ayuda").
        let cmd = first.split('@').next().unwrap_or(first.as_str());
        match cmd {
            "/recordatorio" => Some(Self::Remind),
            "/misrecordatorios" => Some(Self::List),
            "/borrar" | "borra" | "elimina" => Some(Self::Delete),
            "/start" => Some(Self::Start),
            "/ayuda" | "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Everything after the command word, trimmed.
pub fn argument(text: &str) -> &str {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => text[i..].trim(),
        None => "",
    }
}

/// Handle a command and return the response text.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> String {
    let arg = argument(ctx.text);
    match cmd {
        Command::Remind => reminders::handle_remind(ctx.manager, ctx.chat_id, arg, ctx.lang).await,
        Command::List => reminders::handle_list(ctx.manager, ctx.chat_id, ctx.lang).await,
        Command::Delete => reminders::handle_delete(ctx.manager, ctx.chat_id, arg, ctx.lang).await,
        Command::Start => i18n::welcome(ctx.lang, ctx.bot_name, ctx.partner_name),
        Command::Help => i18n::help(ctx.lang, ctx.bot_name),
    }
}
