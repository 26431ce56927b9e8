use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://ecom.tinkoff.ru/api/v2/";
pub const DEFAULT_BOT_URL: &str = "https://t.me/BURYAT_VPN_BOT";
pub const DEFAULT_NOTIFICATION_URL: &str = "https://your-server.com/tbank/callback";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub success_url: String,
    pub fail_url: String,
    pub notification_url: String,
    /// Unset means the transport default (no explicit timeout).
    pub request_timeout_ms: Option<u64>,
    pub settings_path: PathBuf,
    pub telegram_api_url: String,
    pub bot_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            success_url: DEFAULT_BOT_URL.to_string(),
            fail_url: DEFAULT_BOT_URL.to_string(),
            notification_url: DEFAULT_NOTIFICATION_URL.to_string(),
            request_timeout_ms: None,
            settings_path: PathBuf::from("settings.toml"),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            bot_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("TBANK_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            success_url: env::var("TBANK_SUCCESS_URL")
                .unwrap_or_else(|_| DEFAULT_BOT_URL.to_string()),
            fail_url: env::var("TBANK_FAIL_URL")
                .unwrap_or_else(|_| DEFAULT_BOT_URL.to_string()),
            notification_url: env::var("TBANK_NOTIFICATION_URL")
                .unwrap_or_else(|_| DEFAULT_NOTIFICATION_URL.to_string()),
            request_timeout_ms: env::var("TBANK_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            settings_path: env::var("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("settings.toml")),
            telegram_api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.to_string()),
            bot_token: env::var("BOT_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Validated base URL, always ending in `/` so endpoints can be appended.
    pub fn processor_base_url(&self) -> Result<String, ConfigError> {
        let mut url = Url::parse(&self.base_url)?.to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        Ok(url)
    }
}
