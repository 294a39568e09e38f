//! Damage report store implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_entity::damage::NewDamageReport;
use toolrack_entity::store::DamageStore;

/// PostgreSQL-backed damage report store.
#[derive(Debug, Clone)]
pub struct PgDamageStore {
    pool: PgPool,
}

impl PgDamageStore {
    /// Create a new damage store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DamageStore for PgDamageStore {
    async fn create_report(&self, new: &NewDamageReport) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO damage_reports (locker_id, nik, note, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(new.locker_id)
        .bind(&new.nik)
        .bind(new.note.as_deref())
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create damage report", e)
        })
    }

    async fn add_report_items(
        &self,
        report_id: i64,
        items: &[(i64, Option<String>)],
    ) -> AppResult<()> {
        for (tool_id, note) in items {
            sqlx::query(
                "INSERT INTO damage_report_items (report_id, tool_id, note) VALUES ($1, $2, $3)",
            )
            .bind(report_id)
            .bind(tool_id)
            .bind(note.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert report item", e)
            })?;
        }

        Ok(())
    }

    async fn delete_report(&self, report_id: i64) -> AppResult<()> {
        // Items cascade via FK.
        sqlx::query("DELETE FROM damage_reports WHERE id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete damage report", e)
            })?;

        Ok(())
    }
}
