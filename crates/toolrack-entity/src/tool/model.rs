//! Tool entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::action::ToolAction;
use super::status::ToolStatus;

/// A physical item stored inside exactly one locker for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tool {
    /// Unique tool identifier.
    pub id: i64,
    /// The owning locker.
    pub locker_id: i64,
    /// Human-readable name.
    pub name: String,
    /// Category label.
    pub category: Option<String>,
    /// QR slug used by the per-tool endpoint.
    pub qr_code: String,
    /// Current lifecycle status.
    pub status: ToolStatus,
    /// NIK of the current holder, if any.
    pub current_holder: Option<String>,
    /// Last accepted transition.
    pub last_event_type: Option<ToolAction>,
    /// When the last transition happened.
    pub last_event_at: Option<DateTime<Utc>>,
    /// Note attached to the last transition.
    pub last_event_note: Option<String>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When the tool row was created.
    pub created_at: DateTime<Utc>,
}

/// The denormalized column set every accepted transition writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRowUpdate {
    /// New status.
    pub status: ToolStatus,
    /// New holder NIK (cleared when `None`).
    pub current_holder: Option<String>,
    /// The transition being recorded.
    pub last_event_type: ToolAction,
    /// Transition timestamp.
    pub last_event_at: DateTime<Utc>,
    /// Note attached to the transition.
    pub last_event_note: Option<String>,
}
