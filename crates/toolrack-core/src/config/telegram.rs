//! Telegram messaging configuration.

use serde::{Deserialize, Serialize};

/// Telegram Bot API configuration.
///
/// Used for OTP delivery to admin chats. When `enabled` is false the
/// server starts with a no-op messenger and OTP issuance always fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Whether Telegram delivery is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Bot token issued by BotFather.
    #[serde(default)]
    pub bot_token: String,
    /// Base URL of the Bot API (override for tests).
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            api_base: default_api_base(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}
