//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Create a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status indicator.
    pub status: String,
    /// Backing store status: "connected" or "unreachable".
    pub database: String,
    /// Crate version.
    pub version: String,
}

/// Successful OTP verification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifyResponse {
    /// The verified admin NIK.
    pub nik: String,
    /// Display name.
    pub name: String,
    /// Role wire string.
    pub role: Option<String>,
}
