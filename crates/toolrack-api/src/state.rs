//! Application state shared across handlers and middleware.

use std::sync::Arc;

use toolrack_core::config::AppConfig;
use toolrack_core::traits::health::HealthProbe;
use toolrack_core::traits::messenger::Messenger;
use toolrack_entity::store::{
    DamageStore, EventStore, LockerStore, OtpStore, ProfileDirectory, SessionStore, ToolStore,
};
use toolrack_service::{LockerEngine, OtpService, ToolService};

/// Store trait objects needed to assemble the services.
///
/// Both backends produce one of these: PostgreSQL in `main`, the
/// in-memory backend in tests and development runs.
#[derive(Clone)]
pub struct StoreSet {
    /// Locker rows and the locker-level conditional update.
    pub lockers: Arc<dyn LockerStore>,
    /// Tool rows and transitions.
    pub tools: Arc<dyn ToolStore>,
    /// Sessions and pairing queries.
    pub sessions: Arc<dyn SessionStore>,
    /// Damage reports.
    pub damage: Arc<dyn DamageStore>,
    /// The append-only event ledgers.
    pub events: Arc<dyn EventStore>,
    /// Profile lookup.
    pub profiles: Arc<dyn ProfileDirectory>,
    /// OTP codes.
    pub otps: Arc<dyn OtpStore>,
    /// Backend liveness for the health endpoint.
    pub health: Arc<dyn HealthProbe>,
}

/// Application state passed to every Axum handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Locker checkout/checkin engine.
    pub lockers: Arc<LockerEngine>,
    /// Per-tool action service.
    pub tools: Arc<ToolService>,
    /// Admin OTP login service.
    pub otp: Arc<OtpService>,
    /// Backend liveness for the health endpoint.
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Assemble the services over a store set and messenger.
    pub fn new(config: Arc<AppConfig>, stores: StoreSet, messenger: Arc<dyn Messenger>) -> Self {
        let lockers = Arc::new(LockerEngine::new(
            Arc::clone(&stores.lockers),
            Arc::clone(&stores.tools),
            Arc::clone(&stores.sessions),
            Arc::clone(&stores.damage),
            Arc::clone(&stores.events),
            Arc::clone(&stores.profiles),
        ));
        let tools = Arc::new(ToolService::new(
            Arc::clone(&stores.tools),
            Arc::clone(&stores.events),
        ));
        let otp = Arc::new(OtpService::new(
            Arc::clone(&stores.otps),
            Arc::clone(&stores.profiles),
            messenger,
            config.otp.clone(),
        ));

        Self {
            config,
            lockers,
            tools,
            otp,
            health: stores.health,
        }
    }
}
