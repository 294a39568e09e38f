//! In-memory implementation of every store contract.
//!
//! All state lives behind a single `tokio::sync::Mutex`, which makes each
//! store call atomic — the conditional status updates therefore have the
//! same first-writer-wins semantics as the SQL backend. Used by the
//! integration tests and by `database.backend = "memory"` development
//! runs.
//!
//! Write failures can be injected per table to exercise the compensation
//! paths without a database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use toolrack_core::AppError;
use toolrack_core::result::AppResult;
use toolrack_core::traits::health::HealthProbe;
use toolrack_core::types::pagination::{PageRequest, PageResponse};

use toolrack_entity::damage::{DamageReport, DamageReportItem, NewDamageReport};
use toolrack_entity::locker::{Locker, LockerEvent, LockerStatus, NewLockerEvent, normalize_code};
use toolrack_entity::otp::{NewOtpCode, OtpCode};
use toolrack_entity::profile::{Profile, Role};
use toolrack_entity::session::{LockerSession, LockerSessionItem, NewLockerSession, SessionKind};
use toolrack_entity::store::{
    DamageStore, EventStore, LockerStore, OtpStore, ProfileDirectory, SessionStore, ToolStore,
};
use toolrack_entity::tool::{NewToolEvent, Tool, ToolEvent, ToolRowUpdate, ToolStatus};

#[derive(Debug, Default)]
struct State {
    lockers: BTreeMap<i64, Locker>,
    tools: BTreeMap<i64, Tool>,
    sessions: BTreeMap<i64, LockerSession>,
    session_items: Vec<LockerSessionItem>,
    locker_events: Vec<LockerEvent>,
    tool_events: Vec<ToolEvent>,
    damage_reports: BTreeMap<i64, DamageReport>,
    report_items: Vec<DamageReportItem>,
    profiles: Vec<Profile>,
    otp_codes: BTreeMap<i64, OtpCode>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory backend implementing all store traits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    fail_locker_events: AtomicBool,
    fail_tool_events: AtomicBool,
    fail_tool_updates: AtomicBool,
    fail_damage_reports: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make locker-event appends fail until reset.
    pub fn set_fail_locker_events(&self, fail: bool) {
        self.fail_locker_events.store(fail, Ordering::SeqCst);
    }

    /// Make tool-event appends fail until reset.
    pub fn set_fail_tool_events(&self, fail: bool) {
        self.fail_tool_events.store(fail, Ordering::SeqCst);
    }

    /// Make tool row updates fail until reset.
    pub fn set_fail_tool_updates(&self, fail: bool) {
        self.fail_tool_updates.store(fail, Ordering::SeqCst);
    }

    /// Make damage-report inserts fail until reset.
    pub fn set_fail_damage_reports(&self, fail: bool) {
        self.fail_damage_reports.store(fail, Ordering::SeqCst);
    }

    /// Insert a locker and return it.
    pub async fn seed_locker(&self, code: &str, name: &str) -> Locker {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let locker = Locker {
            id,
            code: code.to_string(),
            code_norm: normalize_code(code),
            name: name.to_string(),
            location: None,
            status: LockerStatus::Available,
            holder_nik: None,
            status_updated_at: Utc::now(),
            is_active: true,
            created_at: Utc::now(),
        };
        state.lockers.insert(id, locker.clone());
        locker
    }

    /// Insert a tool owned by `locker_id` and return it.
    pub async fn seed_tool(&self, locker_id: i64, name: &str, slug: &str) -> Tool {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let tool = Tool {
            id,
            locker_id,
            name: name.to_string(),
            category: None,
            qr_code: slug.to_string(),
            status: ToolStatus::Available,
            current_holder: None,
            last_event_type: None,
            last_event_at: None,
            last_event_note: None,
            is_active: true,
            created_at: Utc::now(),
        };
        state.tools.insert(id, tool.clone());
        tool
    }

    /// Insert a profile and return it.
    pub async fn seed_profile(
        &self,
        nik: &str,
        role: Option<Role>,
        active: bool,
        telegram_chat_id: Option<i64>,
    ) -> Profile {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let profile = Profile {
            id,
            nik: nik.to_string(),
            name: format!("User {nik}"),
            role,
            is_active: active,
            telegram_chat_id,
            created_at: Utc::now(),
        };
        state.profiles.push(profile.clone());
        profile
    }

    /// Fetch a locker by id (test inspection).
    pub async fn locker_by_id(&self, id: i64) -> Option<Locker> {
        self.state.lock().await.lockers.get(&id).cloned()
    }

    /// Fetch a tool by id (test inspection).
    pub async fn tool_by_id(&self, id: i64) -> Option<Tool> {
        self.state.lock().await.tools.get(&id).cloned()
    }

    /// All locker events for one locker, in insertion order (test inspection).
    pub async fn locker_events_for(&self, locker_id: i64) -> Vec<LockerEvent> {
        self.state
            .lock()
            .await
            .locker_events
            .iter()
            .filter(|e| e.locker_id == locker_id)
            .cloned()
            .collect()
    }

    /// All tool events for one tool, in insertion order (test inspection).
    pub async fn tool_events_for(&self, tool_id: i64) -> Vec<ToolEvent> {
        self.state
            .lock()
            .await
            .tool_events
            .iter()
            .filter(|e| e.tool_id == tool_id)
            .cloned()
            .collect()
    }

    /// Damage reports for one locker with their items (test inspection).
    pub async fn damage_reports_for(
        &self,
        locker_id: i64,
    ) -> Vec<(DamageReport, Vec<DamageReportItem>)> {
        let state = self.state.lock().await;
        state
            .damage_reports
            .values()
            .filter(|r| r.locker_id == locker_id)
            .map(|r| {
                let items = state
                    .report_items
                    .iter()
                    .filter(|i| i.report_id == r.id)
                    .cloned()
                    .collect();
                (r.clone(), items)
            })
            .collect()
    }

    /// Number of sessions currently stored (test inspection).
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

#[async_trait]
impl HealthProbe for MemoryBackend {
    async fn is_healthy(&self) -> bool {
        true
    }
}

#[async_trait]
impl LockerStore for MemoryBackend {
    async fn find_by_code_norm(&self, code_norm: &str) -> AppResult<Option<Locker>> {
        let state = self.state.lock().await;
        Ok(state
            .lockers
            .values()
            .find(|l| l.code_norm == code_norm)
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Locker>> {
        let state = self.state.lock().await;
        Ok(state.lockers.values().find(|l| l.code == code).cloned())
    }

    async fn update_status_where(
        &self,
        id: i64,
        expected: LockerStatus,
        new_status: LockerStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        match state.lockers.get_mut(&id) {
            Some(locker) if locker.status == expected => {
                locker.status = new_status;
                locker.holder_nik = holder_nik.map(str::to_string);
                locker.status_updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn restore_status(
        &self,
        id: i64,
        status: LockerStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(locker) = state.lockers.get_mut(&id) {
            locker.status = status;
            locker.holder_nik = holder_nik.map(str::to_string);
            locker.status_updated_at = Utc::now();
        }
        Ok(())
    }

    async fn count_active_tools(&self, locker_id: i64) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .tools
            .values()
            .filter(|t| t.locker_id == locker_id && t.is_active)
            .count() as i64)
    }

    async fn set_active(&self, id: i64, active: bool) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        match state.lockers.get_mut(&id) {
            Some(locker) => {
                locker.is_active = active;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl ToolStore for MemoryBackend {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tool>> {
        let state = self.state.lock().await;
        Ok(state.tools.values().find(|t| t.qr_code == slug).cloned())
    }

    async fn find_in_locker(&self, locker_id: i64, ids: &[i64]) -> AppResult<Vec<Tool>> {
        let state = self.state.lock().await;
        Ok(state
            .tools
            .values()
            .filter(|t| t.locker_id == locker_id && ids.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn list_active_by_locker(&self, locker_id: i64) -> AppResult<Vec<Tool>> {
        let state = self.state.lock().await;
        Ok(state
            .tools
            .values()
            .filter(|t| t.locker_id == locker_id && t.is_active)
            .cloned()
            .collect())
    }

    async fn apply_bulk_transition(
        &self,
        locker_id: i64,
        ids: &[i64],
        update: &ToolRowUpdate,
    ) -> AppResult<Vec<i64>> {
        if self.fail_tool_updates.load(Ordering::SeqCst) {
            return Err(AppError::database("Injected tool update failure"));
        }
        let mut state = self.state.lock().await;
        let mut updated = Vec::new();
        for id in ids {
            if let Some(tool) = state.tools.get_mut(id) {
                if tool.locker_id == locker_id && tool.is_active {
                    tool.status = update.status;
                    tool.current_holder = update.current_holder.clone();
                    tool.last_event_type = Some(update.last_event_type);
                    tool.last_event_at = Some(update.last_event_at);
                    tool.last_event_note = update.last_event_note.clone();
                    updated.push(*id);
                }
            }
        }
        Ok(updated)
    }

    async fn apply_transition(&self, id: i64, update: &ToolRowUpdate) -> AppResult<Option<Tool>> {
        if self.fail_tool_updates.load(Ordering::SeqCst) {
            return Err(AppError::database("Injected tool update failure"));
        }
        let mut state = self.state.lock().await;
        Ok(state.tools.get_mut(&id).map(|tool| {
            tool.status = update.status;
            tool.current_holder = update.current_holder.clone();
            tool.last_event_type = Some(update.last_event_type);
            tool.last_event_at = Some(update.last_event_at);
            tool.last_event_note = update.last_event_note.clone();
            tool.clone()
        }))
    }

    async fn restore_status(
        &self,
        locker_id: i64,
        ids: &[i64],
        status: ToolStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for id in ids {
            if let Some(tool) = state.tools.get_mut(id) {
                if tool.locker_id == locker_id {
                    tool.status = status;
                    tool.current_holder = holder_nik.map(str::to_owned);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryBackend {
    async fn create(&self, new: &NewLockerSession) -> AppResult<i64> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.sessions.insert(
            id,
            LockerSession {
                id,
                locker_id: new.locker_id,
                nik: new.nik.clone(),
                session_type: new.session_type,
                pair_checkout_id: new.pair_checkout_id,
                created_at: new.created_at,
            },
        );
        Ok(id)
    }

    async fn add_items(&self, session_id: i64, tool_ids: &[i64]) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for tool_id in tool_ids {
            state.session_items.push(LockerSessionItem {
                session_id,
                tool_id: *tool_id,
            });
        }
        Ok(())
    }

    async fn delete(&self, session_id: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.sessions.remove(&session_id);
        state.session_items.retain(|i| i.session_id != session_id);
        Ok(())
    }

    async fn paired_checkout_ids(&self, locker_id: i64) -> AppResult<Vec<i64>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .filter(|s| s.locker_id == locker_id && s.session_type == SessionKind::Checkin)
            .filter_map(|s| s.pair_checkout_id)
            .collect())
    }

    async fn recent_checkouts(
        &self,
        locker_id: i64,
        nik: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<LockerSession>> {
        let state = self.state.lock().await;
        let mut checkouts: Vec<LockerSession> = state
            .sessions
            .values()
            .filter(|s| s.locker_id == locker_id && s.session_type == SessionKind::Checkout)
            .filter(|s| nik.is_none_or(|n| s.nik == n))
            .cloned()
            .collect();
        checkouts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        checkouts.truncate(limit as usize);
        Ok(checkouts)
    }
}

#[async_trait]
impl EventStore for MemoryBackend {
    async fn append_locker_event(&self, new: &NewLockerEvent) -> AppResult<i64> {
        if self.fail_locker_events.load(Ordering::SeqCst) {
            return Err(AppError::database("Injected locker event failure"));
        }
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.locker_events.push(LockerEvent {
            id,
            locker_id: new.locker_id,
            action: new.action,
            nik: new.nik.clone(),
            note: new.note.clone(),
            created_at: new.created_at,
        });
        Ok(id)
    }

    async fn append_tool_events(&self, events: &[NewToolEvent]) -> AppResult<()> {
        if self.fail_tool_events.load(Ordering::SeqCst) {
            return Err(AppError::database("Injected tool event failure"));
        }
        let mut state = self.state.lock().await;
        for event in events {
            let id = state.next_id();
            state.tool_events.push(ToolEvent {
                id,
                tool_id: event.tool_id,
                event_type: event.event_type,
                condition: event.condition,
                nik: event.nik.clone(),
                note: event.note.clone(),
                event_time: event.event_time,
            });
        }
        Ok(())
    }

    async fn locker_history(
        &self,
        locker_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LockerEvent>> {
        let state = self.state.lock().await;
        let mut events: Vec<LockerEvent> = state
            .locker_events
            .iter()
            .filter(|e| e.locker_id == locker_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let total = events.len() as u64;
        let items = events
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn tool_history(
        &self,
        tool_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ToolEvent>> {
        let state = self.state.lock().await;
        let mut events: Vec<ToolEvent> = state
            .tool_events
            .iter()
            .filter(|e| e.tool_id == tool_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| (b.event_time, b.id).cmp(&(a.event_time, a.id)));
        let total = events.len() as u64;
        let items = events
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}

#[async_trait]
impl DamageStore for MemoryBackend {
    async fn create_report(&self, new: &NewDamageReport) -> AppResult<i64> {
        if self.fail_damage_reports.load(Ordering::SeqCst) {
            return Err(AppError::database("Injected damage report failure"));
        }
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.damage_reports.insert(
            id,
            DamageReport {
                id,
                locker_id: new.locker_id,
                nik: new.nik.clone(),
                note: new.note.clone(),
                created_at: new.created_at,
            },
        );
        Ok(id)
    }

    async fn add_report_items(
        &self,
        report_id: i64,
        items: &[(i64, Option<String>)],
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for (tool_id, note) in items {
            state.report_items.push(DamageReportItem {
                report_id,
                tool_id: *tool_id,
                note: note.clone(),
            });
        }
        Ok(())
    }

    async fn delete_report(&self, report_id: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.damage_reports.remove(&report_id);
        state.report_items.retain(|i| i.report_id != report_id);
        Ok(())
    }
}

#[async_trait]
impl ProfileDirectory for MemoryBackend {
    async fn find_by_nik(&self, nik: &str) -> AppResult<Option<Profile>> {
        let state = self.state.lock().await;
        Ok(state.profiles.iter().find(|p| p.nik == nik).cloned())
    }
}

#[async_trait]
impl OtpStore for MemoryBackend {
    async fn insert_code(&self, new: &NewOtpCode) -> AppResult<i64> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.otp_codes.insert(
            id,
            OtpCode {
                id,
                nik: new.nik.clone(),
                code: new.code.clone(),
                expires_at: new.expires_at,
                used_at: None,
                created_at: new.created_at,
            },
        );
        Ok(id)
    }

    async fn find_valid_code(
        &self,
        nik: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<OtpCode>> {
        let state = self.state.lock().await;
        Ok(state
            .otp_codes
            .values()
            .filter(|c| c.nik == nik && c.code == code && c.is_valid(now))
            .max_by_key(|c| (c.created_at, c.id))
            .cloned())
    }

    async fn mark_used(&self, id: i64, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        match state.otp_codes.get_mut(&id) {
            Some(code) if code.used_at.is_none() => {
                code.used_at = Some(now);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
