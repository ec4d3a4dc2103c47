use serde::{Deserialize, Serialize};

/// Conversation context passed to an AI provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// System prompt prepended to every request.
    pub system_prompt: String,
    /// The current user message. Chat replies are single-turn.
    pub current_message: String,
}

/// A structured message for API-based providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// "user" or "assistant".
    pub role: String,
    /// The message content.
    pub content: String,
}

impl Context {
    /// Create a new context with just a current message and default system prompt.
    pub fn new(message: &str) -> Self {
        Self {
            system_prompt: default_system_prompt(),
            current_message: message.to_string(),
        }
    }

    /// Convert context to structured API messages.
    ///
    /// Returns `(system_prompt, messages)`; the system prompt is kept apart
    /// so each provider can place it where its API expects it.
    pub fn to_api_messages(&self) -> (String, Vec<ApiMessage>) {
        let message = ApiMessage {
            role: "user".to_string(),
            content: self.current_message.clone(),
        };
        (self.system_prompt.clone(), vec![message])
    }
}

/// Build the persona prompt used for free-form chat replies.
pub fn persona_prompt(bot_name: &str, partner_name: &str, language: &str) -> String {
    format!(
        "You are {bot_name}, a warm and supportive personal assistant talking with \
         {partner_name}. Keep replies short (two or three sentences), kind and encouraging. \
         Never give medical, legal or financial advice beyond gentle common sense. \
         Always answer in {language}."
    )
}

fn default_system_prompt() -> String {
    "You are a warm, supportive personal assistant. Keep replies short and kind.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_api_messages_basic() {
        let ctx = Context::new("hola");
        let (system, messages) = ctx.to_api_messages();
        assert!(!system.is_empty());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "hola");
    }

    #[test]
    fn test_to_api_messages_keeps_custom_prompt() {
        let ctx = Context {
            system_prompt: "Be kind.".into(),
            current_message: "¿Qué tal?".into(),
        };
        let (system, messages) = ctx.to_api_messages();
        assert_eq!(system, "Be kind.");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "¿Qué tal?");
    }

    #[test]
    fn test_context_deserialize() {
        let json = r#"{"system_prompt":"test","current_message":"hi"}"#;
        let ctx: Context = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.system_prompt, "test");
        assert_eq!(ctx.current_message, "hi");
    }

    #[test]
    fn test_persona_prompt_mentions_names_and_language() {
        let prompt = persona_prompt("Minitats", "amor", "Spanish");
        assert!(prompt.contains("Minitats"));
        assert!(prompt.contains("amor"));
        assert!(prompt.contains("Spanish"));
    }
}
