//! Event ledger store implementation.
//!
//! Inserts only; no update or delete path exists for event rows anywhere
//! in the system. History reads order by `created_at`/`event_time` with
//! `id` as the insertion-order tie-break.

use async_trait::async_trait;
use sqlx::PgPool;

use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_core::types::pagination::{PageRequest, PageResponse};
use toolrack_entity::locker::{LockerEvent, NewLockerEvent};
use toolrack_entity::store::EventStore;
use toolrack_entity::tool::{NewToolEvent, ToolEvent};

/// PostgreSQL-backed event ledger.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Create a new event store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn append_locker_event(&self, new: &NewLockerEvent) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO locker_events (locker_id, action, nik, note, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(new.locker_id)
        .bind(new.action)
        .bind(&new.nik)
        .bind(new.note.as_deref())
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert locker event", e)
        })
    }

    async fn append_tool_events(&self, events: &[NewToolEvent]) -> AppResult<()> {
        for event in events {
            sqlx::query(
                "INSERT INTO tool_events (tool_id, event_type, condition, nik, note, event_time) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(event.tool_id)
            .bind(event.event_type)
            .bind(event.condition)
            .bind(&event.nik)
            .bind(event.note.as_deref())
            .bind(event.event_time)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert tool event", e)
            })?;
        }

        Ok(())
    }

    async fn locker_history(
        &self,
        locker_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LockerEvent>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM locker_events WHERE locker_id = $1")
                .bind(locker_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count locker events", e)
                })?;

        let events = sqlx::query_as::<_, LockerEvent>(
            "SELECT * FROM locker_events WHERE locker_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(locker_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list locker events", e)
        })?;

        Ok(PageResponse::new(
            events,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn tool_history(
        &self,
        tool_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ToolEvent>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tool_events WHERE tool_id = $1")
            .bind(tool_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count tool events", e)
            })?;

        let events = sqlx::query_as::<_, ToolEvent>(
            "SELECT * FROM tool_events WHERE tool_id = $1 \
             ORDER BY event_time DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(tool_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tool events", e))?;

        Ok(PageResponse::new(
            events,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
