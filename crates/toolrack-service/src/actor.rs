//! Actor (NIK) validation.
//!
//! Every mutating operation starts here: the submitted NIK must be
//! numeric, registered, active, and carry the right role before any
//! state is touched. Lookup failures fail closed.

use std::sync::Arc;

use toolrack_core::{AppError, AppResult};
use toolrack_entity::profile::{Profile, Role};
use toolrack_entity::store::ProfileDirectory;

/// Resolves and gates the acting NIK.
#[derive(Clone)]
pub struct ActorValidator {
    profiles: Arc<dyn ProfileDirectory>,
}

impl ActorValidator {
    /// Create a validator over a profile directory.
    pub fn new(profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { profiles }
    }

    fn checked_format(nik: &str) -> AppResult<&str> {
        let nik = nik.trim();
        if nik.is_empty() {
            return Err(AppError::validation("NIK wajib diisi."));
        }
        if !nik.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("NIK harus berupa angka."));
        }
        Ok(nik)
    }

    async fn lookup_active(&self, nik: &str) -> AppResult<Profile> {
        let profile = self
            .profiles
            .find_by_nik(nik)
            .await?
            .ok_or_else(|| AppError::forbidden("NIK tidak terdaftar."))?;

        if !profile.is_active {
            return Err(AppError::forbidden("User nonaktif."));
        }
        Ok(profile)
    }

    /// Resolve a NIK to an active technician profile.
    ///
    /// A profile with no role counts as a technician.
    pub async fn technician(&self, nik: &str) -> AppResult<Profile> {
        let nik = Self::checked_format(nik)?;
        let profile = self.lookup_active(nik).await?;
        if !profile.is_technician() {
            return Err(AppError::forbidden("NIK bukan teknisi."));
        }
        Ok(profile)
    }

    /// Resolve a NIK to an active admin profile.
    pub async fn admin(&self, nik: &str) -> AppResult<Profile> {
        let nik = Self::checked_format(nik)?;
        let profile = self.lookup_active(nik).await?;
        if profile.role != Some(Role::Admin) {
            return Err(AppError::forbidden("NIK bukan admin."));
        }
        Ok(profile)
    }
}
