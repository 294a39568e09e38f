//! Tool status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a tool.
///
/// This is the single source of truth for tool state. The locker-level
/// checkout/checkin flow moves tools between these states in bulk; the
/// per-tool action endpoint moves them one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tool_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    /// In its locker, ready for checkout.
    #[sqlx(rename = "AVAILABLE")]
    Available,
    /// Held by a technician.
    #[sqlx(rename = "IN_USE")]
    InUse,
    /// Reported damaged; unavailable until marked fixed.
    #[sqlx(rename = "DAMAGED")]
    Damaged,
}

impl ToolStatus {
    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::InUse => "IN_USE",
            Self::Damaged => "DAMAGED",
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolStatus {
    type Err = toolrack_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "IN_USE" => Ok(Self::InUse),
            "DAMAGED" => Ok(Self::Damaged),
            _ => Err(toolrack_core::AppError::validation(format!(
                "Invalid tool status: '{s}'. Expected AVAILABLE, IN_USE, or DAMAGED"
            ))),
        }
    }
}
