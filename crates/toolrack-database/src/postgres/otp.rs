//! OTP code store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_entity::otp::{NewOtpCode, OtpCode};
use toolrack_entity::store::OtpStore;

/// PostgreSQL-backed OTP store.
#[derive(Debug, Clone)]
pub struct PgOtpStore {
    pool: PgPool,
}

impl PgOtpStore {
    /// Create a new OTP store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpStore for PgOtpStore {
    async fn insert_code(&self, new: &NewOtpCode) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO otp_codes (nik, code, expires_at, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new.nik)
        .bind(&new.code)
        .bind(new.expires_at)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert OTP code", e))
    }

    async fn find_valid_code(
        &self,
        nik: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<OtpCode>> {
        sqlx::query_as::<_, OtpCode>(
            "SELECT * FROM otp_codes \
             WHERE nik = $1 AND code = $2 AND used_at IS NULL AND expires_at > $3 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(nik)
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find OTP code", e))
    }

    async fn mark_used(&self, id: i64, now: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE otp_codes SET used_at = $1 WHERE id = $2 AND used_at IS NULL")
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to consume OTP code", e)
                })?;

        Ok(result.rows_affected())
    }
}
