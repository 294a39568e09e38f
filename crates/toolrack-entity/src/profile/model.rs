//! Profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Role assigned to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Technician: may check lockers and tools in and out.
    #[sqlx(rename = "TECH")]
    Tech,
    /// Administrator: dashboard access via OTP login.
    #[sqlx(rename = "ADMIN")]
    Admin,
}

impl Role {
    /// Return the role as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "TECH",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user identified by NIK.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Unique profile identifier.
    pub id: i64,
    /// National-ID-style identifier; the actor identity everywhere.
    pub nik: String,
    /// Display name.
    pub name: String,
    /// Assigned role; an unset role is treated as technician.
    pub role: Option<Role>,
    /// Whether the profile may act.
    pub is_active: bool,
    /// Telegram chat registered for OTP delivery (admins).
    pub telegram_chat_id: Option<i64>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Whether this profile may perform technician custody operations.
    pub fn is_technician(&self) -> bool {
        matches!(self.role, None | Some(Role::Tech))
    }
}
