//! Locker audit events (append-only).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// The two locker-level custody transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "locker_action")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockerAction {
    /// Custody transferred to a technician.
    #[sqlx(rename = "CHECKOUT")]
    Checkout,
    /// Custody returned.
    #[sqlx(rename = "CHECKIN")]
    Checkin,
}

impl LockerAction {
    /// Return the action as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkout => "CHECKOUT",
            Self::Checkin => "CHECKIN",
        }
    }
}

impl fmt::Display for LockerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row in the permanent locker history ledger.
///
/// Rows are inserted by accepted transitions and are never updated or
/// deleted. Insertion order (id) breaks ties when timestamps collide.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LockerEvent {
    /// Event identifier; ascending in insertion order.
    pub id: i64,
    /// The locker this event belongs to.
    pub locker_id: i64,
    /// Which transition happened.
    pub action: LockerAction,
    /// Actor NIK.
    pub nik: String,
    /// Free-text note, e.g. `DAMAGED(1): retak`.
    pub note: Option<String>,
    /// When the event happened.
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a locker event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLockerEvent {
    /// The locker the event belongs to.
    pub locker_id: i64,
    /// Which transition happened.
    pub action: LockerAction,
    /// Actor NIK.
    pub nik: String,
    /// Free-text note.
    pub note: Option<String>,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}
