//! Damage report entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A report created when a checkin returns one or more damaged tools.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DamageReport {
    /// Unique report identifier.
    pub id: i64,
    /// The locker whose checkin produced the report.
    pub locker_id: i64,
    /// Reporting technician NIK.
    pub nik: String,
    /// Report-level note.
    pub note: Option<String>,
    /// When the report was filed.
    pub created_at: DateTime<Utc>,
}

/// Per-tool note row under a damage report.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DamageReportItem {
    /// The owning report.
    pub report_id: i64,
    /// The damaged tool.
    pub tool_id: i64,
    /// Damage description for this tool.
    pub note: Option<String>,
}

/// Payload for filing a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDamageReport {
    /// The locker whose checkin produced the report.
    pub locker_id: i64,
    /// Reporting technician NIK.
    pub nik: String,
    /// Report-level note.
    pub note: Option<String>,
    /// Report timestamp.
    pub created_at: DateTime<Utc>,
}

/// A damaged tool as submitted with a checkin request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamagedItem {
    /// The damaged tool id.
    pub tool_id: i64,
    /// Damage description.
    pub note: Option<String>,
}
