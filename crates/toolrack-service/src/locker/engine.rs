//! Locker checkout/checkin engine.
//!
//! The locker conditional status update is the single concurrency
//! control: of two racing requests, exactly one flips the row and the
//! other loses with zero rows affected. Everything after the flip runs
//! under a [`Saga`] so a failed step restores locker, tool, session,
//! and report state. The event ledgers are append-only; ledger rows
//! written before a failing step are left in place, and the locker
//! event is appended last so a compensated operation never appears in
//! locker history.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use toolrack_core::{AppError, AppResult};
use toolrack_entity::damage::{DamagedItem, NewDamageReport};
use toolrack_entity::locker::{Locker, LockerAction, LockerStatus, NewLockerEvent, normalize_code};
use toolrack_entity::session::{NewLockerSession, SessionKind};
use toolrack_entity::store::{
    DamageStore, EventStore, LockerStore, ProfileDirectory, SessionStore, ToolStore,
};
use toolrack_entity::tool::{
    EventCondition, NewToolEvent, Tool, ToolAction, ToolRowUpdate, ToolStatus,
};

use crate::actor::ActorValidator;
use crate::history::HistoryRecorder;
use crate::saga::Saga;
use crate::session::PairingResolver;

/// Result of an accepted checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOutcome {
    /// The CHECKOUT session created.
    pub session_id: i64,
}

/// Result of an accepted checkin.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinOutcome {
    /// The CHECKIN session created.
    pub session_id: i64,
    /// The CHECKOUT session this checkin closed.
    pub paired_checkout_id: i64,
    /// Number of tools reported damaged.
    pub damaged_count: usize,
}

/// A locker together with its active tools, for read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct LockerView {
    /// The locker row.
    pub locker: Locker,
    /// Active tools owned by the locker.
    pub tools: Vec<Tool>,
}

/// Orchestrates locker-level custody transfers.
#[derive(Clone)]
pub struct LockerEngine {
    lockers: Arc<dyn LockerStore>,
    tools: Arc<dyn ToolStore>,
    sessions: Arc<dyn SessionStore>,
    damage: Arc<dyn DamageStore>,
    history: HistoryRecorder,
    actors: ActorValidator,
    pairing: PairingResolver,
}

impl LockerEngine {
    /// Create an engine over the given stores.
    pub fn new(
        lockers: Arc<dyn LockerStore>,
        tools: Arc<dyn ToolStore>,
        sessions: Arc<dyn SessionStore>,
        damage: Arc<dyn DamageStore>,
        events: Arc<dyn EventStore>,
        profiles: Arc<dyn ProfileDirectory>,
    ) -> Self {
        Self {
            lockers,
            tools,
            sessions: Arc::clone(&sessions),
            damage,
            history: HistoryRecorder::new(events),
            actors: ActorValidator::new(profiles),
            pairing: PairingResolver::new(sessions),
        }
    }

    /// Paged history reader for locker events.
    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }

    /// Look up a locker by normalized code first, exact code second.
    pub async fn resolve(&self, code: &str) -> AppResult<Locker> {
        if let Some(locker) = self.lockers.find_by_code_norm(&normalize_code(code)).await? {
            return Ok(locker);
        }
        self.lockers
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Locker tidak ditemukan."))
    }

    /// Locker detail plus its active tools.
    pub async fn view(&self, code: &str) -> AppResult<LockerView> {
        let locker = self.resolve(code).await?;
        let tools = self.tools.list_active_by_locker(locker.id).await?;
        Ok(LockerView { locker, tools })
    }

    /// Check a batch of tools out of a locker.
    ///
    /// Claims the locker with a conditional AVAILABLE→IN_USE update,
    /// then creates the CHECKOUT session, moves the tools to IN_USE,
    /// and appends the history events. Any step failure after the claim
    /// compensates back to the starting state.
    pub async fn checkout(
        &self,
        code: &str,
        nik: &str,
        tool_ids: &[i64],
    ) -> AppResult<CheckoutOutcome> {
        let ids = dedupe(tool_ids);
        if ids.is_empty() {
            return Err(AppError::validation("ToolIds kosong."));
        }

        let profile = self.actors.technician(nik).await?;
        let nik = profile.nik;

        let locker = self.resolve(code).await?;
        require_active(&locker)?;

        if let Some(open_id) = self.pairing.open_checkout(locker.id, None).await? {
            return Err(AppError::conflict(format!(
                "Masih ada checkout aktif (session {open_id}). Checkin dulu sebelum checkout baru."
            )));
        }

        self.require_owned_active(&locker, &ids, Some(ToolStatus::Available))
            .await?;

        let claimed = self
            .lockers
            .update_status_where(
                locker.id,
                LockerStatus::Available,
                LockerStatus::InUse,
                Some(nik.as_str()),
            )
            .await?;
        if claimed == 0 {
            return Err(AppError::conflict("Locker sudah IN_USE."));
        }

        let mut saga = Saga::new();
        {
            let lockers = Arc::clone(&self.lockers);
            let locker_id = locker.id;
            saga.push_undo("locker-claim", move || async move {
                lockers
                    .restore_status(locker_id, LockerStatus::Available, None)
                    .await
            });
        }

        let now = Utc::now();
        match self.checkout_steps(&mut saga, &locker, &nik, &ids, now).await {
            Ok(session_id) => {
                saga.commit();
                info!(
                    locker_id = locker.id,
                    code = %locker.code,
                    nik = %nik,
                    session_id,
                    tools = ids.len(),
                    "checkout accepted"
                );
                Ok(CheckoutOutcome { session_id })
            }
            Err(err) => {
                warn!(
                    locker_id = locker.id,
                    nik = %nik,
                    error = %err,
                    "checkout failed after locker claim; compensating"
                );
                saga.compensate().await;
                Err(err)
            }
        }
    }

    async fn checkout_steps(
        &self,
        saga: &mut Saga,
        locker: &Locker,
        nik: &str,
        ids: &[i64],
        now: DateTime<Utc>,
    ) -> AppResult<i64> {
        let session_id = self
            .sessions
            .create(&NewLockerSession {
                locker_id: locker.id,
                nik: nik.to_string(),
                session_type: SessionKind::Checkout,
                pair_checkout_id: None,
                created_at: now,
            })
            .await?;
        {
            let sessions = Arc::clone(&self.sessions);
            saga.push_undo("checkout-session", move || async move {
                sessions.delete(session_id).await
            });
        }
        self.sessions.add_items(session_id, ids).await?;

        let update = ToolRowUpdate {
            status: ToolStatus::InUse,
            current_holder: Some(nik.to_string()),
            last_event_type: ToolAction::Checkout,
            last_event_at: now,
            last_event_note: None,
        };
        let updated = self.tools.apply_bulk_transition(locker.id, ids, &update).await?;
        {
            let tools = Arc::clone(&self.tools);
            let locker_id = locker.id;
            let touched = updated.clone();
            saga.push_undo("tool-claims", move || async move {
                tools
                    .restore_status(locker_id, &touched, ToolStatus::Available, None)
                    .await
            });
        }
        if updated.len() != ids.len() {
            return Err(AppError::database("Tidak semua tool ter-update saat checkout."));
        }

        let events: Vec<NewToolEvent> = ids
            .iter()
            .map(|&tool_id| NewToolEvent {
                tool_id,
                event_type: ToolAction::Checkout,
                condition: Some(EventCondition::Ok),
                nik: nik.to_string(),
                note: None,
                event_time: now,
            })
            .collect();
        self.history.record_tool_events(&events).await?;

        // Last step on purpose: locker history must never show a
        // checkout that was compensated away.
        self.history
            .record_locker_event(&NewLockerEvent {
                locker_id: locker.id,
                action: LockerAction::Checkout,
                nik: nik.to_string(),
                note: None,
                created_at: now,
            })
            .await?;

        Ok(session_id)
    }

    /// Check a batch of tools back into a locker.
    ///
    /// The checkin pairs itself to the newest open checkout (preferring
    /// one made by the same NIK), releases the locker with a conditional
    /// IN_USE→AVAILABLE update, returns tools to AVAILABLE or DAMAGED,
    /// files a damage report when needed, and appends history events.
    pub async fn checkin(
        &self,
        code: &str,
        nik: &str,
        tool_ids: &[i64],
        damaged: &[DamagedItem],
    ) -> AppResult<CheckinOutcome> {
        let ids = dedupe(tool_ids);
        if ids.is_empty() {
            return Err(AppError::validation("ToolIds kosong."));
        }

        let id_set: HashSet<i64> = ids.iter().copied().collect();
        if damaged.iter().any(|d| !id_set.contains(&d.tool_id)) {
            return Err(AppError::validation(
                "Tool damaged tidak ada di daftar checkin.",
            ));
        }

        let profile = self.actors.technician(nik).await?;
        let nik = profile.nik;

        let locker = self.resolve(code).await?;
        require_active(&locker)?;

        if locker.status == LockerStatus::InUse
            && locker.holder_nik.as_deref() != Some(nik.as_str())
        {
            let holder = locker.holder_nik.as_deref().unwrap_or("-");
            return Err(AppError::conflict(format!(
                "Locker sedang dipegang NIK {holder}. Tidak bisa checkin pakai NIK ini."
            )));
        }

        let pair_id = self
            .pairing
            .open_checkout_for(locker.id, &nik)
            .await?
            .ok_or_else(|| AppError::conflict("Tidak ada checkout aktif untuk di-checkin."))?;

        self.require_owned_active(&locker, &ids, None).await?;

        let released = self
            .lockers
            .update_status_where(locker.id, LockerStatus::InUse, LockerStatus::Available, None)
            .await?;
        if released == 0 {
            return Err(AppError::conflict("Locker sudah AVAILABLE."));
        }

        let mut saga = Saga::new();
        {
            let lockers = Arc::clone(&self.lockers);
            let locker_id = locker.id;
            let holder = locker.holder_nik.clone();
            saga.push_undo("locker-release", move || async move {
                lockers
                    .restore_status(locker_id, LockerStatus::InUse, holder.as_deref())
                    .await
            });
        }

        let now = Utc::now();
        match self
            .checkin_steps(&mut saga, &locker, &nik, &ids, damaged, pair_id, now)
            .await
        {
            Ok(session_id) => {
                saga.commit();
                info!(
                    locker_id = locker.id,
                    code = %locker.code,
                    nik = %nik,
                    session_id,
                    paired_checkout_id = pair_id,
                    damaged = damaged.len(),
                    "checkin accepted"
                );
                Ok(CheckinOutcome {
                    session_id,
                    paired_checkout_id: pair_id,
                    damaged_count: damaged.len(),
                })
            }
            Err(err) => {
                warn!(
                    locker_id = locker.id,
                    nik = %nik,
                    error = %err,
                    "checkin failed after locker release; compensating"
                );
                saga.compensate().await;
                Err(err)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn checkin_steps(
        &self,
        saga: &mut Saga,
        locker: &Locker,
        nik: &str,
        ids: &[i64],
        damaged: &[DamagedItem],
        pair_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<i64> {
        let session_id = self
            .sessions
            .create(&NewLockerSession {
                locker_id: locker.id,
                nik: nik.to_string(),
                session_type: SessionKind::Checkin,
                pair_checkout_id: Some(pair_id),
                created_at: now,
            })
            .await?;
        {
            let sessions = Arc::clone(&self.sessions);
            saga.push_undo("checkin-session", move || async move {
                sessions.delete(session_id).await
            });
        }
        self.sessions.add_items(session_id, ids).await?;

        let damaged_ids: HashSet<i64> = damaged.iter().map(|d| d.tool_id).collect();
        let ok_ids: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !damaged_ids.contains(id))
            .collect();

        if !ok_ids.is_empty() {
            let update = ToolRowUpdate {
                status: ToolStatus::Available,
                current_holder: None,
                last_event_type: ToolAction::Checkin,
                last_event_at: now,
                last_event_note: None,
            };
            let updated = self
                .tools
                .apply_bulk_transition(locker.id, &ok_ids, &update)
                .await?;
            self.push_tool_undo(saga, "tool-returns", locker.id, updated.clone(), nik);
            if updated.len() != ok_ids.len() {
                return Err(AppError::database("Tidak semua tool ter-update saat checkin."));
            }
        }

        for item in damaged {
            let update = ToolRowUpdate {
                status: ToolStatus::Damaged,
                current_holder: None,
                last_event_type: ToolAction::Checkin,
                last_event_at: now,
                last_event_note: item.note.clone(),
            };
            let updated = self
                .tools
                .apply_bulk_transition(locker.id, &[item.tool_id], &update)
                .await?;
            self.push_tool_undo(saga, "tool-damage-marks", locker.id, updated.clone(), nik);
            if updated.is_empty() {
                return Err(AppError::database(
                    "Tidak ada tool yang ter-update jadi DAMAGED (cek tool_id / locker_id / is_active).",
                ));
            }
        }

        let summary = damage_summary(damaged);
        if !damaged.is_empty() {
            let report_id = self
                .damage
                .create_report(&NewDamageReport {
                    locker_id: locker.id,
                    nik: nik.to_string(),
                    note: summary.clone(),
                    created_at: now,
                })
                .await?;
            {
                let damage = Arc::clone(&self.damage);
                saga.push_undo("damage-report", move || async move {
                    damage.delete_report(report_id).await
                });
            }
            let items: Vec<(i64, Option<String>)> = damaged
                .iter()
                .map(|d| (d.tool_id, d.note.clone()))
                .collect();
            self.damage.add_report_items(report_id, &items).await?;
        }

        let events: Vec<NewToolEvent> = ids
            .iter()
            .map(|&tool_id| {
                let damage_note = damaged
                    .iter()
                    .find(|d| d.tool_id == tool_id)
                    .and_then(|d| d.note.clone());
                NewToolEvent {
                    tool_id,
                    event_type: ToolAction::Checkin,
                    condition: Some(if damaged_ids.contains(&tool_id) {
                        EventCondition::Damaged
                    } else {
                        EventCondition::Ok
                    }),
                    nik: nik.to_string(),
                    note: damage_note,
                    event_time: now,
                }
            })
            .collect();
        self.history.record_tool_events(&events).await?;

        // As with checkout, the locker event closes the saga.
        self.history
            .record_locker_event(&NewLockerEvent {
                locker_id: locker.id,
                action: LockerAction::Checkin,
                nik: nik.to_string(),
                note: summary,
                created_at: now,
            })
            .await?;

        Ok(session_id)
    }

    /// Soft-delete a locker.
    ///
    /// Refused while the locker is IN_USE or still owns active tools.
    pub async fn deactivate(&self, code: &str) -> AppResult<()> {
        let locker = self.resolve(code).await?;

        if locker.status == LockerStatus::InUse {
            return Err(AppError::conflict(
                "Locker sedang IN_USE. Checkin dulu sebelum menonaktifkan.",
            ));
        }

        let active_tools = self.lockers.count_active_tools(locker.id).await?;
        if active_tools > 0 {
            return Err(AppError::conflict(format!(
                "Locker masih memiliki {active_tools} tool aktif."
            )));
        }

        let affected = self.lockers.set_active(locker.id, false).await?;
        if affected == 0 {
            return Err(AppError::not_found("Locker tidak ditemukan."));
        }

        info!(locker_id = locker.id, code = %locker.code, "locker deactivated");
        Ok(())
    }

    fn push_tool_undo(
        &self,
        saga: &mut Saga,
        step: &'static str,
        locker_id: i64,
        touched: Vec<i64>,
        nik: &str,
    ) {
        let tools = Arc::clone(&self.tools);
        let holder = nik.to_string();
        saga.push_undo(step, move || async move {
            tools
                .restore_status(locker_id, &touched, ToolStatus::InUse, Some(holder.as_str()))
                .await
        });
    }

    /// Check that every id names an active tool of this locker, and
    /// optionally that each one currently has `required` status.
    async fn require_owned_active(
        &self,
        locker: &Locker,
        ids: &[i64],
        required: Option<ToolStatus>,
    ) -> AppResult<()> {
        let tools = self.tools.find_in_locker(locker.id, ids).await?;
        if tools.len() != ids.len() {
            return Err(AppError::validation("Ada tool yang bukan milik locker ini."));
        }
        if tools.iter().any(|t| !t.is_active) {
            return Err(AppError::validation("Ada tool yang sudah nonaktif."));
        }
        if let Some(required) = required {
            if let Some(bad) = tools.iter().find(|t| t.status != required) {
                return Err(AppError::conflict(format!(
                    "Tool {} tidak {}.",
                    bad.name,
                    required.as_str()
                )));
            }
        }
        Ok(())
    }
}

fn require_active(locker: &Locker) -> AppResult<()> {
    if !locker.is_active {
        return Err(AppError::forbidden("Locker nonaktif."));
    }
    Ok(())
}

/// Preserve order, drop duplicate ids.
fn dedupe(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Checkin-note summary: `DAMAGED(n): <notes or ->`.
fn damage_summary(damaged: &[DamagedItem]) -> Option<String> {
    if damaged.is_empty() {
        return None;
    }
    let notes: Vec<&str> = damaged
        .iter()
        .filter_map(|d| d.note.as_deref())
        .filter(|n| !n.trim().is_empty())
        .collect();
    let detail = if notes.is_empty() {
        "-".to_string()
    } else {
        notes.join("; ")
    };
    Some(format!("DAMAGED({}): {}", damaged.len(), detail))
}

#[cfg(test)]
mod tests {
    use toolrack_core::error::ErrorKind;
    use toolrack_database::MemoryBackend;
    use toolrack_entity::profile::Role;

    use super::*;

    async fn fixture() -> (Arc<MemoryBackend>, LockerEngine, Locker, Vec<i64>) {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .seed_profile("12345", Some(Role::Tech), true, None)
            .await;
        backend.seed_profile("67890", None, true, None).await;
        let locker = backend.seed_locker("LOKER-004", "Rak Utama").await;
        let t1 = backend.seed_tool(locker.id, "Obeng", "tool-obeng").await;
        let t2 = backend.seed_tool(locker.id, "Tang", "tool-tang").await;
        let engine = engine(&backend);
        (backend, engine, locker, vec![t1.id, t2.id])
    }

    fn engine(backend: &Arc<MemoryBackend>) -> LockerEngine {
        LockerEngine::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
        )
    }

    #[tokio::test]
    async fn test_checkout_claims_locker_and_tools() {
        let (backend, engine, locker, tools) = fixture().await;

        let outcome = engine.checkout("004", "12345", &tools).await.unwrap();

        let locker = backend.locker_by_id(locker.id).await.unwrap();
        assert_eq!(locker.status, LockerStatus::InUse);
        assert_eq!(locker.holder_nik.as_deref(), Some("12345"));
        assert!(locker.holder_invariant_holds());

        for id in &tools {
            let tool = backend.tool_by_id(*id).await.unwrap();
            assert_eq!(tool.status, ToolStatus::InUse);
            assert_eq!(tool.current_holder.as_deref(), Some("12345"));
        }

        let events = backend.locker_events_for(locker.id).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, LockerAction::Checkout);
        assert!(outcome.session_id > 0);
    }

    #[tokio::test]
    async fn test_second_checkout_is_rejected() {
        let (_backend, engine, _locker, tools) = fixture().await;

        engine.checkout("004", "12345", &tools).await.unwrap();
        let err = engine.checkout("004", "67890", &tools).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_checkin_on_available_locker_is_rejected() {
        let (_backend, engine, _locker, tools) = fixture().await;

        let err = engine.checkin("004", "12345", &tools, &[]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Tidak ada checkout aktif untuk di-checkin.");
    }

    #[tokio::test]
    async fn test_checkin_by_other_nik_is_rejected() {
        let (_backend, engine, _locker, tools) = fixture().await;

        engine.checkout("004", "12345", &tools).await.unwrap();
        let err = engine.checkin("004", "67890", &tools, &[]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("dipegang NIK 12345"));
    }

    #[tokio::test]
    async fn test_round_trip_restores_availability_and_pairs_sessions() {
        let (backend, engine, locker, tools) = fixture().await;

        let out = engine.checkout("004", "12345", &tools).await.unwrap();
        let back = engine.checkin("004", "12345", &tools, &[]).await.unwrap();
        assert_eq!(back.paired_checkout_id, out.session_id);

        let locker = backend.locker_by_id(locker.id).await.unwrap();
        assert_eq!(locker.status, LockerStatus::Available);
        assert!(locker.holder_nik.is_none());

        for id in &tools {
            let tool = backend.tool_by_id(*id).await.unwrap();
            assert_eq!(tool.status, ToolStatus::Available);
            assert!(tool.current_holder.is_none());
        }

        // A second checkout is possible again.
        assert!(engine.checkout("004", "12345", &tools).await.is_ok());
    }

    #[tokio::test]
    async fn test_damaged_checkin_marks_tool_and_files_report() {
        let (backend, engine, locker, tools) = fixture().await;

        engine.checkout("004", "12345", &tools).await.unwrap();
        let damaged = vec![DamagedItem {
            tool_id: tools[0],
            note: Some("retak".to_string()),
        }];
        let out = engine.checkin("004", "12345", &tools, &damaged).await.unwrap();
        assert_eq!(out.damaged_count, 1);

        let broken = backend.tool_by_id(tools[0]).await.unwrap();
        assert_eq!(broken.status, ToolStatus::Damaged);
        let fine = backend.tool_by_id(tools[1]).await.unwrap();
        assert_eq!(fine.status, ToolStatus::Available);

        let events = backend.locker_events_for(locker.id).await;
        let checkin = events
            .iter()
            .find(|e| e.action == LockerAction::Checkin)
            .unwrap();
        assert_eq!(checkin.note.as_deref(), Some("DAMAGED(1): retak"));

        let reports = backend.damage_reports_for(locker.id).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].1.len(), 1);
        assert_eq!(reports[0].1[0].tool_id, tools[0]);

        let tool_events = backend.tool_events_for(tools[0]).await;
        let checkin_event = tool_events
            .iter()
            .find(|e| e.event_type == ToolAction::Checkin)
            .unwrap();
        assert_eq!(checkin_event.condition, Some(EventCondition::Damaged));
        assert_eq!(checkin_event.note.as_deref(), Some("retak"));
    }

    #[tokio::test]
    async fn test_failed_checkout_step_compensates_all_state() {
        let (backend, engine, locker, tools) = fixture().await;

        backend.set_fail_tool_events(true);
        let err = engine.checkout("004", "12345", &tools).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        backend.set_fail_tool_events(false);

        let locker = backend.locker_by_id(locker.id).await.unwrap();
        assert_eq!(locker.status, LockerStatus::Available);
        assert!(locker.holder_nik.is_none());

        for id in &tools {
            let tool = backend.tool_by_id(*id).await.unwrap();
            assert_eq!(tool.status, ToolStatus::Available);
            assert!(tool.current_holder.is_none());
        }
        assert_eq!(backend.session_count().await, 0);

        // No trace of the aborted checkout in locker history either.
        assert!(backend.locker_events_for(locker.id).await.is_empty());

        // The locker is usable again after the rollback.
        assert!(engine.checkout("004", "12345", &tools).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_damage_report_compensates_checkin() {
        let (backend, engine, locker, tools) = fixture().await;

        engine.checkout("004", "12345", &tools).await.unwrap();
        backend.set_fail_damage_reports(true);
        let damaged = vec![DamagedItem {
            tool_id: tools[0],
            note: None,
        }];
        let err = engine
            .checkin("004", "12345", &tools, &damaged)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        backend.set_fail_damage_reports(false);

        // Locker back to IN_USE with the original holder; tools back out.
        let locker = backend.locker_by_id(locker.id).await.unwrap();
        assert_eq!(locker.status, LockerStatus::InUse);
        assert_eq!(locker.holder_nik.as_deref(), Some("12345"));
        for id in &tools {
            let tool = backend.tool_by_id(*id).await.unwrap();
            assert_eq!(tool.status, ToolStatus::InUse);
            assert_eq!(tool.current_holder.as_deref(), Some("12345"));
        }
        assert!(backend.damage_reports_for(locker.id).await.is_empty());

        // Only the original checkout is on record; the aborted checkin
        // never reached the locker ledger.
        let events = backend.locker_events_for(locker.id).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, LockerAction::Checkout);

        // The open checkout is still pending, so checkin can retry.
        assert!(engine.checkin("004", "12345", &tools, &damaged).await.is_ok());
    }

    #[tokio::test]
    async fn test_racing_checkouts_admit_exactly_one() {
        let (backend, engine, locker, tools) = fixture().await;

        let first = engine.clone();
        let second = engine.clone();
        let ids_a = tools.clone();
        let ids_b = tools.clone();
        let (a, b) = tokio::join!(
            first.checkout("004", "12345", &ids_a),
            second.checkout("004", "67890", &ids_b),
        );

        // The conditional locker update admits one winner; the loser
        // fails without disturbing the winner's state.
        assert!(a.is_ok() != b.is_ok());
        let loser = if a.is_ok() { b.unwrap_err() } else { a.unwrap_err() };
        assert_eq!(loser.kind, ErrorKind::Conflict);

        let locker = backend.locker_by_id(locker.id).await.unwrap();
        assert_eq!(locker.status, LockerStatus::InUse);
        assert!(matches!(
            locker.holder_nik.as_deref(),
            Some("12345") | Some("67890")
        ));
        assert_eq!(backend.session_count().await, 1);
        assert_eq!(backend.locker_events_for(locker.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_rejects_foreign_and_busy_tools() {
        let (backend, engine, _locker, tools) = fixture().await;
        let other = backend.seed_locker("LOKER-009", "Rak Lain").await;
        let foreign = backend.seed_tool(other.id, "Palu", "tool-palu").await;

        let err = engine
            .checkout("004", "12345", &[tools[0], foreign.id])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_deactivate_requires_no_active_tools() {
        let (backend, engine, _locker, _tools) = fixture().await;
        let empty = backend.seed_locker("LOKER-007", "Rak Kosong").await;

        let err = engine.deactivate("004").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        engine.deactivate("007").await.unwrap();
        let empty = backend.locker_by_id(empty.id).await.unwrap();
        assert!(!empty.is_active);
    }

    #[tokio::test]
    async fn test_unknown_locker_is_not_found() {
        let (_backend, engine, _locker, tools) = fixture().await;
        let err = engine.checkout("999", "12345", &tools).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Locker tidak ditemukan.");
    }
}
