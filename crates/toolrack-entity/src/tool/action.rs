//! Tool actions and the transition guard table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use toolrack_core::AppError;

use super::status::ToolStatus;

/// The four per-tool transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tool_action")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolAction {
    /// AVAILABLE → IN_USE, holder set.
    #[sqlx(rename = "CHECKOUT")]
    Checkout,
    /// IN_USE → AVAILABLE, holder cleared.
    #[sqlx(rename = "CHECKIN")]
    Checkin,
    /// Any non-DAMAGED → DAMAGED, holder kept.
    #[sqlx(rename = "REPORT_DAMAGED")]
    ReportDamaged,
    /// DAMAGED → AVAILABLE, holder cleared.
    #[sqlx(rename = "MARK_FIXED")]
    MarkFixed,
}

/// What a transition does to the tool's holder field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderChange {
    /// Assign the acting NIK as holder.
    Assign,
    /// Clear the holder.
    Clear,
    /// Leave the holder untouched.
    Keep,
}

/// The outcome of a guard check: where the tool goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolTransition {
    /// The status after the transition.
    pub next_status: ToolStatus,
    /// What happens to the holder field.
    pub holder: HolderChange,
}

impl ToolAction {
    /// Return the action as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkout => "CHECKOUT",
            Self::Checkin => "CHECKIN",
            Self::ReportDamaged => "REPORT_DAMAGED",
            Self::MarkFixed => "MARK_FIXED",
        }
    }

    /// Apply the guard table to the current status.
    ///
    /// Returns the planned transition, or a conflict error when the
    /// precondition does not hold. A guard violation causes no mutation.
    pub fn guard(&self, current: ToolStatus) -> Result<ToolTransition, AppError> {
        match self {
            Self::Checkout => match current {
                ToolStatus::Available => Ok(ToolTransition {
                    next_status: ToolStatus::InUse,
                    holder: HolderChange::Assign,
                }),
                _ => Err(AppError::conflict("Tool not available")),
            },
            Self::Checkin => match current {
                ToolStatus::InUse => Ok(ToolTransition {
                    next_status: ToolStatus::Available,
                    holder: HolderChange::Clear,
                }),
                _ => Err(AppError::conflict("Tool not in use")),
            },
            Self::ReportDamaged => match current {
                ToolStatus::Damaged => Err(AppError::conflict("Already damaged")),
                _ => Ok(ToolTransition {
                    next_status: ToolStatus::Damaged,
                    holder: HolderChange::Keep,
                }),
            },
            Self::MarkFixed => match current {
                ToolStatus::Damaged => Ok(ToolTransition {
                    next_status: ToolStatus::Available,
                    holder: HolderChange::Clear,
                }),
                _ => Err(AppError::conflict("Tool is not damaged")),
            },
        }
    }
}

impl fmt::Display for ToolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHECKOUT" => Ok(Self::Checkout),
            "CHECKIN" => Ok(Self::Checkin),
            "REPORT_DAMAGED" => Ok(Self::ReportDamaged),
            "MARK_FIXED" => Ok(Self::MarkFixed),
            _ => Err(AppError::validation("Invalid action")),
        }
    }
}
