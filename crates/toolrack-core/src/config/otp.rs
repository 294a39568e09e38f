//! OTP issuance configuration.

use serde::{Deserialize, Serialize};

/// One-time password settings for admin login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Code validity window in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: i64,
    /// Number of decimal digits in a code.
    #[serde(default = "default_digits")]
    pub digits: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            digits: default_digits(),
        }
    }
}

fn default_ttl() -> i64 {
    300
}

fn default_digits() -> u32 {
    6
}
