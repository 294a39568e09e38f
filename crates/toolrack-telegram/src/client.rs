//! Telegram Bot API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use toolrack_core::config::telegram::TelegramConfig;
use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_core::traits::messenger::Messenger;

/// HTTP timeout for a single Bot API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    bot_token: String,
    api_base: String,
}

impl TelegramClient {
    /// Build a client from configuration.
    pub fn new(config: &TelegramConfig) -> AppResult<Self> {
        if config.bot_token.is_empty() {
            return Err(AppError::configuration("telegram.bot_token is not set"));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            bot_token: config.bot_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Telegram request failed",
                    e,
                )
            })?;

        let status = response.status();
        let body: ApiResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Telegram returned an unreadable response (HTTP {status})"),
                e,
            )
        })?;

        if !body.ok {
            let description = body.description.unwrap_or_else(|| "no description".to_string());
            return Err(AppError::external_service(format!(
                "Telegram rejected sendMessage (HTTP {status}): {description}"
            )));
        }

        debug!(chat_id, "Telegram message delivered");
        Ok(())
    }
}
