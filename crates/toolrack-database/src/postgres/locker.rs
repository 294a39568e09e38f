//! Locker store implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_entity::locker::{Locker, LockerStatus};
use toolrack_entity::store::LockerStore;

/// PostgreSQL-backed locker store.
#[derive(Debug, Clone)]
pub struct PgLockerStore {
    pool: PgPool,
}

impl PgLockerStore {
    /// Create a new locker store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LockerStore for PgLockerStore {
    async fn find_by_code_norm(&self, code_norm: &str) -> AppResult<Option<Locker>> {
        sqlx::query_as::<_, Locker>("SELECT * FROM lockers WHERE code_norm = $1")
            .bind(code_norm)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find locker by code_norm", e)
            })
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Locker>> {
        sqlx::query_as::<_, Locker>("SELECT * FROM lockers WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find locker by code", e)
            })
    }

    async fn update_status_where(
        &self,
        id: i64,
        expected: LockerStatus,
        new_status: LockerStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE lockers SET status = $1, holder_nik = $2, status_updated_at = NOW() \
             WHERE id = $3 AND status = $4",
        )
        .bind(new_status)
        .bind(holder_nik)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update locker status", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn restore_status(
        &self,
        id: i64,
        status: LockerStatus,
        holder_nik: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE lockers SET status = $1, holder_nik = $2, status_updated_at = NOW() \
             WHERE id = $3",
        )
        .bind(status)
        .bind(holder_nik)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to restore locker status", e)
        })?;

        Ok(())
    }

    async fn count_active_tools(&self, locker_id: i64) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tools WHERE locker_id = $1 AND is_active = TRUE",
        )
        .bind(locker_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count active tools", e))
    }

    async fn set_active(&self, id: i64, active: bool) -> AppResult<u64> {
        let result = sqlx::query("UPDATE lockers SET is_active = $1 WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set locker active flag", e)
            })?;

        Ok(result.rows_affected())
    }
}
