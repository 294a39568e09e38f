//! OTP code entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single-use admin login code delivered over Telegram.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtpCode {
    /// Unique code identifier.
    pub id: i64,
    /// The admin NIK the code was issued to.
    pub nik: String,
    /// The decimal code string.
    pub code: String,
    /// Expiry instant; the code is invalid afterwards.
    pub expires_at: DateTime<Utc>,
    /// When the code was consumed, if ever.
    pub used_at: Option<DateTime<Utc>>,
    /// When the code was issued.
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    /// Whether the code can still be consumed at `now`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

/// Payload for persisting a freshly issued code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOtpCode {
    /// The admin NIK the code is issued to.
    pub nik: String,
    /// The decimal code string.
    pub code: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
}
