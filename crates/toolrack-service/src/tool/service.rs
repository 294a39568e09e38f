//! Per-tool (QR scan) actions.
//!
//! Unlike the locker flow, the per-tool flow is fail-fast: the event is
//! appended first and the row update follows, so an event-insert failure
//! leaves the tool untouched. There is no compensation here because the
//! guard runs before any write.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use toolrack_core::{AppError, AppResult};
use toolrack_entity::store::{EventStore, ToolStore};
use toolrack_entity::tool::{
    HolderChange, NewToolEvent, Tool, ToolAction, ToolRowUpdate,
};

use crate::history::HistoryRecorder;

/// Handles single-tool transitions addressed by QR slug.
#[derive(Clone)]
pub struct ToolService {
    tools: Arc<dyn ToolStore>,
    history: HistoryRecorder,
}

impl ToolService {
    /// Create a service over the given stores.
    pub fn new(tools: Arc<dyn ToolStore>, events: Arc<dyn EventStore>) -> Self {
        Self {
            tools,
            history: HistoryRecorder::new(events),
        }
    }

    /// Paged history reader for tool events.
    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }

    /// Look up a tool by its QR slug.
    pub async fn get(&self, slug: &str) -> AppResult<Tool> {
        self.tools
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Tool not found"))
    }

    /// Apply one action to a tool.
    ///
    /// The guard table decides admissibility from the tool's current
    /// status; a rejected action mutates nothing.
    pub async fn act(
        &self,
        slug: &str,
        action: ToolAction,
        nik: &str,
        note: Option<&str>,
    ) -> AppResult<Tool> {
        let nik = nik.trim();
        if nik.is_empty() {
            return Err(AppError::validation("NIK is required"));
        }

        let tool = self.get(slug).await?;
        if !tool.is_active {
            return Err(AppError::forbidden("Tool is inactive"));
        }

        let transition = action.guard(tool.status)?;

        // Damage notes only make sense on REPORT_DAMAGED.
        let note = match action {
            ToolAction::ReportDamaged => note.map(str::trim).filter(|n| !n.is_empty()),
            _ => None,
        };

        let now = Utc::now();
        self.history
            .record_tool_events(&[NewToolEvent {
                tool_id: tool.id,
                event_type: action,
                condition: None,
                nik: nik.to_string(),
                note: note.map(str::to_owned),
                event_time: now,
            }])
            .await?;

        let holder = match transition.holder {
            HolderChange::Assign => Some(nik.to_string()),
            HolderChange::Clear => None,
            HolderChange::Keep => tool.current_holder.clone(),
        };
        let update = ToolRowUpdate {
            status: transition.next_status,
            current_holder: holder,
            last_event_type: action,
            last_event_at: now,
            last_event_note: note.map(str::to_owned),
        };

        let updated = self
            .tools
            .apply_transition(tool.id, &update)
            .await?
            .ok_or_else(|| AppError::internal("Tool row vanished during update"))?;

        info!(
            tool_id = tool.id,
            slug = %tool.qr_code,
            action = %action,
            nik = %nik,
            status = %updated.status,
            "tool action accepted"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use toolrack_core::error::ErrorKind;
    use toolrack_database::MemoryBackend;
    use toolrack_entity::tool::ToolStatus;

    use super::*;

    async fn fixture() -> (Arc<MemoryBackend>, ToolService, i64) {
        let backend = Arc::new(MemoryBackend::new());
        let locker = backend.seed_locker("LOKER-001", "Rak").await;
        let tool = backend.seed_tool(locker.id, "Obeng", "tool-obeng").await;
        let service = ToolService::new(backend.clone(), backend.clone());
        (backend, service, tool.id)
    }

    #[tokio::test]
    async fn test_checkout_then_checkin_round_trip() {
        let (backend, service, tool_id) = fixture().await;

        let out = service
            .act("tool-obeng", ToolAction::Checkout, "12345", None)
            .await
            .unwrap();
        assert_eq!(out.status, ToolStatus::InUse);
        assert_eq!(out.current_holder.as_deref(), Some("12345"));

        let back = service
            .act("tool-obeng", ToolAction::Checkin, "12345", None)
            .await
            .unwrap();
        assert_eq!(back.status, ToolStatus::Available);
        assert!(back.current_holder.is_none());

        assert_eq!(backend.tool_events_for(tool_id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_double_checkout_is_conflict() {
        let (_backend, service, _tool_id) = fixture().await;

        service
            .act("tool-obeng", ToolAction::Checkout, "12345", None)
            .await
            .unwrap();
        let err = service
            .act("tool-obeng", ToolAction::Checkout, "67890", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Tool not available");
    }

    #[tokio::test]
    async fn test_report_damaged_keeps_holder_and_records_note() {
        let (backend, service, tool_id) = fixture().await;

        service
            .act("tool-obeng", ToolAction::Checkout, "12345", None)
            .await
            .unwrap();
        let damaged = service
            .act(
                "tool-obeng",
                ToolAction::ReportDamaged,
                "12345",
                Some("gagang patah"),
            )
            .await
            .unwrap();
        assert_eq!(damaged.status, ToolStatus::Damaged);
        assert_eq!(damaged.current_holder.as_deref(), Some("12345"));
        assert_eq!(damaged.last_event_note.as_deref(), Some("gagang patah"));

        let fixed = service
            .act("tool-obeng", ToolAction::MarkFixed, "99999", None)
            .await
            .unwrap();
        assert_eq!(fixed.status, ToolStatus::Available);
        assert!(fixed.current_holder.is_none());

        let events = backend.tool_events_for(tool_id).await;
        assert_eq!(events.len(), 3);
        // Per-tool events carry no checkin condition.
        assert!(events.iter().all(|e| e.condition.is_none()));
    }

    #[tokio::test]
    async fn test_failed_event_insert_leaves_tool_untouched() {
        let (backend, service, tool_id) = fixture().await;

        backend.set_fail_tool_events(true);
        let err = service
            .act("tool-obeng", ToolAction::Checkout, "12345", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        backend.set_fail_tool_events(false);

        let tool = backend.tool_by_id(tool_id).await.unwrap();
        assert_eq!(tool.status, ToolStatus::Available);
        assert!(tool.current_holder.is_none());
        assert!(backend.tool_events_for(tool_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let (_backend, service, _tool_id) = fixture().await;
        let err = service
            .act("tool-missing", ToolAction::Checkout, "12345", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_blank_nik_is_validation_error() {
        let (_backend, service, _tool_id) = fixture().await;
        let err = service
            .act("tool-obeng", ToolAction::Checkout, "  ", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "NIK is required");
    }
}
