//! Abstract datastore contracts.
//!
//! The state engines coordinate exclusively through these traits; the
//! conditional-update methods return the number of affected rows, and a
//! zero return is the losing-race signal, not an error. Two backends
//! exist in `toolrack-database`: PostgreSQL and in-memory
//! (`tokio::sync::Mutex`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use toolrack_core::AppResult;
use toolrack_core::types::pagination::{PageRequest, PageResponse};

use crate::damage::NewDamageReport;
use crate::locker::{Locker, LockerEvent, LockerStatus, NewLockerEvent};
use crate::otp::{NewOtpCode, OtpCode};
use crate::profile::Profile;
use crate::session::{LockerSession, NewLockerSession};
use crate::tool::{NewToolEvent, Tool, ToolEvent, ToolRowUpdate, ToolStatus};

/// Locker row access and the locker-level compare-and-swap.
#[async_trait]
pub trait LockerStore: Send + Sync + 'static {
    /// Find a locker by its canonical 3-digit code.
    async fn find_by_code_norm(&self, code_norm: &str) -> AppResult<Option<Locker>>;

    /// Find a locker by its exact display code.
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Locker>>;

    /// Conditionally transition a locker's status.
    ///
    /// Applies `status = new_status, holder_nik = holder, status_updated_at
    /// = now()` only where the current status equals `expected`. Returns
    /// the number of rows updated; zero means another actor won the race.
    async fn update_status_where(
        &self,
        id: i64,
        expected: LockerStatus,
        new_status: LockerStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<u64>;

    /// Unconditionally restore a locker's status and holder.
    ///
    /// Compensating write used by rollback paths only.
    async fn restore_status(
        &self,
        id: i64,
        status: LockerStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<()>;

    /// Count active tools owned by the locker.
    async fn count_active_tools(&self, locker_id: i64) -> AppResult<i64>;

    /// Soft-delete or reactivate a locker. Returns rows affected.
    async fn set_active(&self, id: i64, active: bool) -> AppResult<u64>;
}

/// Tool row access and per-tool/bulk transitions.
#[async_trait]
pub trait ToolStore: Send + Sync + 'static {
    /// Find a tool by its QR slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tool>>;

    /// Fetch the subset of `ids` that belong to `locker_id`.
    async fn find_in_locker(&self, locker_id: i64, ids: &[i64]) -> AppResult<Vec<Tool>>;

    /// List a locker's active tools.
    async fn list_active_by_locker(&self, locker_id: i64) -> AppResult<Vec<Tool>>;

    /// Apply one transition to a batch of tools.
    ///
    /// Only rows that belong to `locker_id` and are active are touched.
    /// Returns the ids actually updated; callers treat an empty result
    /// as a failed step and compensate.
    async fn apply_bulk_transition(
        &self,
        locker_id: i64,
        ids: &[i64],
        update: &ToolRowUpdate,
    ) -> AppResult<Vec<i64>>;

    /// Apply one transition to a single tool and return the updated row.
    async fn apply_transition(&self, id: i64, update: &ToolRowUpdate) -> AppResult<Option<Tool>>;

    /// Unconditionally restore status and holder for a batch of tools.
    ///
    /// Compensating write used by rollback paths only; the denormalized
    /// last-event columns are left alone.
    async fn restore_status(
        &self,
        locker_id: i64,
        ids: &[i64],
        status: ToolStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<()>;
}

/// Session rows and the pairing queries.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Create a session and return its id.
    async fn create(&self, new: &NewLockerSession) -> AppResult<i64>;

    /// Record which tools were part of a session.
    async fn add_items(&self, session_id: i64, tool_ids: &[i64]) -> AppResult<()>;

    /// Remove a session (and its items) created by an aborted operation.
    ///
    /// Compensation only; committed sessions are never deleted.
    async fn delete(&self, session_id: i64) -> AppResult<()>;

    /// Ids of CHECKOUT sessions already closed by a CHECKIN for this locker.
    async fn paired_checkout_ids(&self, locker_id: i64) -> AppResult<Vec<i64>>;

    /// Most recent CHECKOUT sessions for this locker, newest first,
    /// optionally filtered to one NIK.
    async fn recent_checkouts(
        &self,
        locker_id: i64,
        nik: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<LockerSession>>;
}

/// Append-only event ledger.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Append a locker event; returns its id.
    async fn append_locker_event(&self, new: &NewLockerEvent) -> AppResult<i64>;

    /// Append a batch of tool events.
    async fn append_tool_events(&self, events: &[NewToolEvent]) -> AppResult<()>;

    /// Paged locker history in insertion order, newest first.
    async fn locker_history(
        &self,
        locker_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LockerEvent>>;

    /// Paged tool history in insertion order, newest first.
    async fn tool_history(
        &self,
        tool_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ToolEvent>>;
}

/// Damage report rows.
#[async_trait]
pub trait DamageStore: Send + Sync + 'static {
    /// File a report and return its id.
    async fn create_report(&self, new: &NewDamageReport) -> AppResult<i64>;

    /// Attach per-tool notes to a report.
    async fn add_report_items(
        &self,
        report_id: i64,
        items: &[(i64, Option<String>)],
    ) -> AppResult<()>;

    /// Remove a report (and its items) created by an aborted operation.
    async fn delete_report(&self, report_id: i64) -> AppResult<()>;
}

/// Actor lookup.
#[async_trait]
pub trait ProfileDirectory: Send + Sync + 'static {
    /// Find a profile by NIK.
    async fn find_by_nik(&self, nik: &str) -> AppResult<Option<Profile>>;
}

/// OTP code persistence.
#[async_trait]
pub trait OtpStore: Send + Sync + 'static {
    /// Persist a freshly issued code; returns its id.
    async fn insert_code(&self, new: &NewOtpCode) -> AppResult<i64>;

    /// Find the newest unconsumed, unexpired code for `nik` matching `code`.
    async fn find_valid_code(
        &self,
        nik: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<OtpCode>>;

    /// Mark a code consumed. Returns rows affected (0 if already used).
    async fn mark_used(&self, id: i64, now: DateTime<Utc>) -> AppResult<u64>;
}
