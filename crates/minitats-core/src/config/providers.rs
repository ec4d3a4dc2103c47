use super::defaults::*;
use serde::{Deserialize, Serialize};

/// AI provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub openai: Option<OpenAiConfig>,
}

impl ProviderConfig {
    /// The OpenAI section, if present with a non-empty key.
    pub fn openai_enabled(&self) -> Option<&OpenAiConfig> {
        self.openai.as_ref().filter(|o| !o.api_key.trim().is_empty())
    }
}

/// OpenAI-compatible chat completions config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            base_url: default_openai_base_url(),
        }
    }
}
