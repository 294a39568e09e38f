//! Profile directory implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use toolrack_core::error::{AppError, ErrorKind};
use toolrack_core::result::AppResult;
use toolrack_entity::profile::Profile;
use toolrack_entity::store::ProfileDirectory;

/// PostgreSQL-backed profile lookup.
#[derive(Debug, Clone)]
pub struct PgProfileDirectory {
    pool: PgPool,
}

impl PgProfileDirectory {
    /// Create a new profile directory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
    async fn find_by_nik(&self, nik: &str) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE nik = $1")
            .bind(nik)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find profile by NIK", e)
            })
    }
}
