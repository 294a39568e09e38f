//! Locker session store implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_entity::session::{LockerSession, NewLockerSession, SessionKind};
use toolrack_entity::store::SessionStore;

/// PostgreSQL-backed session store.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new session store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, new: &NewLockerSession) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO locker_sessions (locker_id, nik, session_type, pair_checkout_id, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(new.locker_id)
        .bind(&new.nik)
        .bind(new.session_type)
        .bind(new.pair_checkout_id)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn add_items(&self, session_id: i64, tool_ids: &[i64]) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO locker_session_items (session_id, tool_id) \
             SELECT $1, tool_id FROM UNNEST($2::BIGINT[]) AS t(tool_id)",
        )
        .bind(session_id)
        .bind(tool_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert session items", e)
        })?;

        Ok(())
    }

    async fn delete(&self, session_id: i64) -> AppResult<()> {
        // Items cascade via FK.
        sqlx::query("DELETE FROM locker_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete session", e)
            })?;

        Ok(())
    }

    async fn paired_checkout_ids(&self, locker_id: i64) -> AppResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT pair_checkout_id FROM locker_sessions \
             WHERE locker_id = $1 AND session_type = $2 AND pair_checkout_id IS NOT NULL",
        )
        .bind(locker_id)
        .bind(SessionKind::Checkin)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list paired checkouts", e)
        })
    }

    async fn recent_checkouts(
        &self,
        locker_id: i64,
        nik: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<LockerSession>> {
        let query = match nik {
            Some(nik) => sqlx::query_as::<_, LockerSession>(
                "SELECT * FROM locker_sessions \
                 WHERE locker_id = $1 AND session_type = $2 AND nik = $3 \
                 ORDER BY created_at DESC, id DESC LIMIT $4",
            )
            .bind(locker_id)
            .bind(SessionKind::Checkout)
            .bind(nik)
            .bind(limit),
            None => sqlx::query_as::<_, LockerSession>(
                "SELECT * FROM locker_sessions \
                 WHERE locker_id = $1 AND session_type = $2 \
                 ORDER BY created_at DESC, id DESC LIMIT $3",
            )
            .bind(locker_id)
            .bind(SessionKind::Checkout)
            .bind(limit),
        };

        query.fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list recent checkouts", e)
        })
    }
}
