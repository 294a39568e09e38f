//! Request DTOs.

use serde::{Deserialize, Serialize};

use toolrack_entity::damage::DamagedItem;

/// Body for `POST /api/lockers/{code}/checkout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Acting technician NIK.
    pub nik: String,
    /// Tools leaving the locker.
    pub tool_ids: Vec<i64>,
}

/// Body for `POST /api/lockers/{code}/checkin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinRequest {
    /// Acting technician NIK.
    pub nik: String,
    /// Tools coming back.
    pub tool_ids: Vec<i64>,
    /// Subset of `tool_ids` reported damaged, with per-tool notes.
    #[serde(default)]
    pub damaged: Vec<DamagedItem>,
}

/// Body for `POST /api/tools/{slug}/action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolActionRequest {
    /// One of CHECKOUT, CHECKIN, REPORT_DAMAGED, MARK_FIXED.
    pub action: String,
    /// Acting NIK.
    pub nik: String,
    /// Damage note (REPORT_DAMAGED only).
    #[serde(default)]
    pub note: Option<String>,
}

/// Body for `POST /api/otp/request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRequest {
    /// Admin NIK.
    pub nik: String,
}

/// Body for `POST /api/otp/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifyRequest {
    /// Admin NIK.
    pub nik: String,
    /// The delivered code.
    pub code: String,
}
