//! Locker status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a locker.
///
/// `holder_nik` on the locker row is non-null if and only if the status
/// is `IN_USE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "locker_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockerStatus {
    /// No one holds the locker; checkout is allowed.
    #[sqlx(rename = "AVAILABLE")]
    Available,
    /// The locker is held by exactly one technician.
    #[sqlx(rename = "IN_USE")]
    InUse,
}

impl LockerStatus {
    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::InUse => "IN_USE",
        }
    }
}

impl fmt::Display for LockerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LockerStatus {
    type Err = toolrack_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "IN_USE" => Ok(Self::InUse),
            _ => Err(toolrack_core::AppError::validation(format!(
                "Invalid locker status: '{s}'. Expected AVAILABLE or IN_USE"
            ))),
        }
    }
}
