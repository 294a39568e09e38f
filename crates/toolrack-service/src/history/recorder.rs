//! Append-only history recording and paged reads.

use std::sync::Arc;

use tracing::debug;

use toolrack_core::AppResult;
use toolrack_core::types::pagination::{PageRequest, PageResponse};
use toolrack_entity::locker::{LockerEvent, NewLockerEvent};
use toolrack_entity::store::EventStore;
use toolrack_entity::tool::{NewToolEvent, ToolEvent};

/// Writes and reads the two event ledgers.
///
/// Events are facts about accepted transitions; they are appended and
/// never updated or deleted, including during compensation.
#[derive(Clone)]
pub struct HistoryRecorder {
    events: Arc<dyn EventStore>,
}

impl HistoryRecorder {
    /// Create a recorder over an event store.
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// Append a locker event; returns its id.
    pub async fn record_locker_event(&self, event: &NewLockerEvent) -> AppResult<i64> {
        let id = self.events.append_locker_event(event).await?;
        debug!(
            locker_id = event.locker_id,
            action = %event.action,
            nik = %event.nik,
            event_id = id,
            "locker event recorded"
        );
        Ok(id)
    }

    /// Append a batch of tool events.
    pub async fn record_tool_events(&self, events: &[NewToolEvent]) -> AppResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        self.events.append_tool_events(events).await?;
        debug!(count = events.len(), "tool events recorded");
        Ok(())
    }

    /// Paged locker history, newest first.
    pub async fn locker_history(
        &self,
        locker_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LockerEvent>> {
        self.events.locker_history(locker_id, page).await
    }

    /// Paged tool history, newest first.
    pub async fn tool_history(
        &self,
        tool_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ToolEvent>> {
        self.events.tool_history(tool_id, page).await
    }
}
