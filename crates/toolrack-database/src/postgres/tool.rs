//! Tool store implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_entity::store::ToolStore;
use toolrack_entity::tool::{Tool, ToolRowUpdate, ToolStatus};

/// PostgreSQL-backed tool store.
#[derive(Debug, Clone)]
pub struct PgToolStore {
    pool: PgPool,
}

impl PgToolStore {
    /// Create a new tool store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolStore for PgToolStore {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tool>> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE qr_code = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find tool by slug", e)
            })
    }

    async fn find_in_locker(&self, locker_id: i64, ids: &[i64]) -> AppResult<Vec<Tool>> {
        sqlx::query_as::<_, Tool>(
            "SELECT * FROM tools WHERE id = ANY($1) AND locker_id = $2 ORDER BY id",
        )
        .bind(ids)
        .bind(locker_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find tools in locker", e)
        })
    }

    async fn list_active_by_locker(&self, locker_id: i64) -> AppResult<Vec<Tool>> {
        sqlx::query_as::<_, Tool>(
            "SELECT * FROM tools WHERE locker_id = $1 AND is_active = TRUE ORDER BY id",
        )
        .bind(locker_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list locker tools", e))
    }

    async fn apply_bulk_transition(
        &self,
        locker_id: i64,
        ids: &[i64],
        update: &ToolRowUpdate,
    ) -> AppResult<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "UPDATE tools SET status = $1, current_holder = $2, last_event_type = $3, \
             last_event_at = $4, last_event_note = $5 \
             WHERE id = ANY($6) AND locker_id = $7 AND is_active = TRUE \
             RETURNING id",
        )
        .bind(update.status)
        .bind(update.current_holder.as_deref())
        .bind(update.last_event_type)
        .bind(update.last_event_at)
        .bind(update.last_event_note.as_deref())
        .bind(ids)
        .bind(locker_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to bulk-update tools", e)
        })?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn apply_transition(&self, id: i64, update: &ToolRowUpdate) -> AppResult<Option<Tool>> {
        sqlx::query_as::<_, Tool>(
            "UPDATE tools SET status = $1, current_holder = $2, last_event_type = $3, \
             last_event_at = $4, last_event_note = $5 \
             WHERE id = $6 \
             RETURNING *",
        )
        .bind(update.status)
        .bind(update.current_holder.as_deref())
        .bind(update.last_event_type)
        .bind(update.last_event_at)
        .bind(update.last_event_note.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update tool", e))
    }

    async fn restore_status(
        &self,
        locker_id: i64,
        ids: &[i64],
        status: ToolStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE tools SET status = $1, current_holder = $2 \
             WHERE id = ANY($3) AND locker_id = $4",
        )
        .bind(status)
        .bind(holder_nik)
        .bind(ids)
        .bind(locker_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore tools", e))?;

        Ok(())
    }
}
