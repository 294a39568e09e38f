//! Outbound messaging trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for outbound message delivery (OTP codes to admin chats).
///
/// A delivery failure must surface as an error so the enclosing operation
/// (e.g. OTP issuance) reports failure instead of silently succeeding.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    /// Send a plain-text message to the given chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()>;
}
