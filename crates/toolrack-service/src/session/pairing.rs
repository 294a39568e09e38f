//! Resolution of the open checkout that a checkin closes.
//!
//! A CHECKOUT session is open until a CHECKIN references it through
//! `pair_checkout_id`. The resolver scans a bounded window of the most
//! recent checkouts, newest first, and returns the first one not yet
//! paired.

use std::collections::HashSet;
use std::sync::Arc;

use toolrack_core::AppResult;
use toolrack_entity::store::SessionStore;

/// How many recent checkouts are scanned when pairing a checkin.
const RECENT_CHECKOUT_WINDOW: i64 = 20;

/// Finds the open checkout a checkin should close.
#[derive(Clone)]
pub struct PairingResolver {
    sessions: Arc<dyn SessionStore>,
}

impl PairingResolver {
    /// Create a resolver over a session store.
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Newest checkout for the locker not yet closed by a checkin,
    /// optionally restricted to checkouts made by one NIK.
    pub async fn open_checkout(
        &self,
        locker_id: i64,
        nik: Option<&str>,
    ) -> AppResult<Option<i64>> {
        let closed: HashSet<i64> = self
            .sessions
            .paired_checkout_ids(locker_id)
            .await?
            .into_iter()
            .collect();

        let recent = self
            .sessions
            .recent_checkouts(locker_id, nik, RECENT_CHECKOUT_WINDOW)
            .await?;

        Ok(recent
            .into_iter()
            .find(|s| !closed.contains(&s.id))
            .map(|s| s.id))
    }

    /// Open checkout preferring one made by `nik`, falling back to the
    /// newest open checkout by anyone.
    pub async fn open_checkout_for(&self, locker_id: i64, nik: &str) -> AppResult<Option<i64>> {
        if let Some(id) = self.open_checkout(locker_id, Some(nik)).await? {
            return Ok(Some(id));
        }
        self.open_checkout(locker_id, None).await
    }
}
