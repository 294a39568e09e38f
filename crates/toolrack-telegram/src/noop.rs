//! Messenger used when Telegram delivery is disabled.

use async_trait::async_trait;

use toolrack_core::AppError;
use toolrack_core::result::AppResult;
use toolrack_core::traits::messenger::Messenger;

/// Rejects every send so OTP issuance fails loudly instead of silently
/// swallowing codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMessenger;

#[async_trait]
impl Messenger for NoopMessenger {
    async fn send_message(&self, _chat_id: i64, _text: &str) -> AppResult<()> {
        Err(AppError::external_service("Telegram delivery is disabled"))
    }
}
