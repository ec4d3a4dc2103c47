mod channels;
mod defaults;
mod providers;


pub use channels::*;
pub use providers::*;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::MinitatsError;
use defaults::*;

/// Top-level Minitats configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub minitats: GeneralConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Directory holding reminders.json, users.json, status.json, backups/ and logs/.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Language for bot replies ("Spanish" or "English").
    #[serde(default = "default_language")]
    pub language: String,
    /// IANA time zone used to interpret and display reminder times.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// How the bot addresses its person in canned and AI replies.
    #[serde(default = "default_partner_name")]
    pub partner_name: String,
    /// Chat that receives the boot summary. Empty = no admin reports.
    #[serde(default)]
    pub admin_id: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            language: default_language(),
            timezone: default_timezone(),
            partner_name: default_partner_name(),
            admin_id: None,
        }
    }
}

impl GeneralConfig {
    /// Parse the configured time zone.
    pub fn tz(&self) -> Result<Tz, MinitatsError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| MinitatsError::Config(format!("invalid timezone '{}': {e}", self.timezone)))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.data_dir))
    }
}

/// Reminder delivery and startup recovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Gap since the previous boot above which a boot counts as a restart.
    #[serde(default = "default_restart_threshold")]
    pub restart_threshold_minutes: u64,
    /// Broadcast a notice to every known user after a restart.
    #[serde(default = "default_true")]
    pub notify_on_restart: bool,
    /// Number of boot-time backups to keep. 0 disables backups.
    #[serde(default = "default_backup_keep")]
    pub backup_keep: usize,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            restart_threshold_minutes: default_restart_threshold(),
            notify_on_restart: true,
            backup_keep: default_backup_keep(),
        }
    }
}

/// HTTP health-check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

impl Config {
    /// Apply environment overrides from `lookup`.
    ///
    /// Recognized variables: `TELEGRAM_TOKEN`, `OPENAI_API_KEY`, `ADMIN_ID`,
    /// `WIFE_NAME`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(token) = get("TELEGRAM_TOKEN") {
            let tg = self.channel.telegram.get_or_insert_with(TelegramConfig::default);
            tg.bot_token = token;
            tg.enabled = true;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.provider
                .openai
                .get_or_insert_with(OpenAiConfig::default)
                .api_key = key;
        }
        if let Some(admin) = get("ADMIN_ID") {
            self.minitats.admin_id = Some(admin);
        }
        if let Some(name) = get("WIFE_NAME") {
            self.minitats.partner_name = name;
        }
    }
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, MinitatsError> {
    let mut config = load_file(Path::new(path))?;
    config.apply_env(|key| std::env::var(key).ok());
    config.minitats.tz()?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<Config, MinitatsError> {
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| MinitatsError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| MinitatsError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
