//! Tool audit events (append-only).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::action::ToolAction;

/// Condition recorded on a locker-flow tool event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_condition")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCondition {
    /// The tool came back in working order.
    #[sqlx(rename = "OK")]
    Ok,
    /// The tool was reported damaged.
    #[sqlx(rename = "DAMAGED")]
    Damaged,
}

impl EventCondition {
    /// Return the condition as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Damaged => "DAMAGED",
        }
    }
}

impl fmt::Display for EventCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row in the permanent tool history ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToolEvent {
    /// Event identifier; ascending in insertion order.
    pub id: i64,
    /// The tool this event belongs to.
    pub tool_id: i64,
    /// Which transition happened.
    pub event_type: ToolAction,
    /// Condition at checkin (locker flow only).
    pub condition: Option<EventCondition>,
    /// Actor NIK.
    pub nik: String,
    /// Free-text note (damage description).
    pub note: Option<String>,
    /// When the event happened.
    pub event_time: DateTime<Utc>,
}

/// Payload for appending a tool event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewToolEvent {
    /// The tool the event belongs to.
    pub tool_id: i64,
    /// Which transition happened.
    pub event_type: ToolAction,
    /// Condition at checkin (locker flow only).
    pub condition: Option<EventCondition>,
    /// Actor NIK.
    pub nik: String,
    /// Free-text note.
    pub note: Option<String>,
    /// Event timestamp.
    pub event_time: DateTime<Utc>,
}
