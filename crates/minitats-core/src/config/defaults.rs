//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Minitats".to_string()
}

pub fn default_data_dir() -> String {
    ".".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_language() -> String {
    "Spanish".to_string()
}

pub fn default_timezone() -> String {
    "Europe/Madrid".to_string()
}

pub fn default_partner_name() -> String {
    "amor".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_restart_threshold() -> u64 {
    5
}

pub fn default_backup_keep() -> usize {
    7
}

pub fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_api_port() -> u16 {
    3000
}
