//! Locker entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::LockerStatus;

/// A physical storage unit holding zero or more tools.
///
/// Lookup goes through `code_norm` (zero-padded 3-digit canonical form)
/// first, then the exact display `code`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Locker {
    /// Unique locker identifier.
    pub id: i64,
    /// Display code, e.g. `LOKER-004`.
    pub code: String,
    /// Canonical 3-digit lookup code, e.g. `004`.
    pub code_norm: String,
    /// Human-readable name.
    pub name: String,
    /// Physical location description.
    pub location: Option<String>,
    /// Current lifecycle status.
    pub status: LockerStatus,
    /// NIK of the current holder; set iff `status = IN_USE`.
    pub holder_nik: Option<String>,
    /// When the status last changed.
    pub status_updated_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When the locker row was created.
    pub created_at: DateTime<Utc>,
}

impl Locker {
    /// Check the holder invariant: `holder_nik` is non-null iff `IN_USE`.
    pub fn holder_invariant_holds(&self) -> bool {
        match self.status {
            LockerStatus::InUse => self.holder_nik.is_some(),
            LockerStatus::Available => self.holder_nik.is_none(),
        }
    }
}

/// Derive the canonical lookup code from a user-supplied locker code.
///
/// Takes the rightmost (up to) three digits found anywhere in the input
/// and zero-pads to three characters, so `LOKER-004`, `loker4`, and `004`
/// all normalize to `004`. An input without digits normalizes to `000`.
pub fn normalize_code(code: &str) -> String {
    let digits: String = code.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(3);
    format!("{:0>3}", &digits[start..])
}
