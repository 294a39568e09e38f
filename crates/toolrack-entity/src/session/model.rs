//! Locker session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Whether a session records a checkout or a checkin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_kind")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionKind {
    /// Tools leave the locker.
    #[sqlx(rename = "CHECKOUT")]
    Checkout,
    /// Tools return to the locker.
    #[sqlx(rename = "CHECKIN")]
    Checkin,
}

impl SessionKind {
    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkout => "CHECKOUT",
            Self::Checkin => "CHECKIN",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One checkout or checkin event grouping multiple tools.
///
/// A CHECKOUT session is *open* until exactly one CHECKIN session
/// references it via `pair_checkout_id`; a checkout may be paired at
/// most once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LockerSession {
    /// Unique session identifier.
    pub id: i64,
    /// The locker this session belongs to.
    pub locker_id: i64,
    /// Actor NIK.
    pub nik: String,
    /// Checkout or checkin.
    pub session_type: SessionKind,
    /// For CHECKIN sessions: the CHECKOUT session this closes.
    pub pair_checkout_id: Option<i64>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Join row recording which tools were part of a session.
///
/// Immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LockerSessionItem {
    /// The owning session.
    pub session_id: i64,
    /// The tool included in the session.
    pub tool_id: i64,
}

/// Payload for creating a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLockerSession {
    /// The locker the session belongs to.
    pub locker_id: i64,
    /// Actor NIK.
    pub nik: String,
    /// Checkout or checkin.
    pub session_type: SessionKind,
    /// For CHECKIN sessions: the CHECKOUT session being closed.
    pub pair_checkout_id: Option<i64>,
    /// Session timestamp.
    pub created_at: DateTime<Utc>,
}
