//! ToolRack Server — tool and locker custody tracker.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use toolrack_api::state::{AppState, StoreSet};
use toolrack_core::config::AppConfig;
use toolrack_core::error::AppError;
use toolrack_core::traits::messenger::Messenger;
use toolrack_database::postgres::{
    PgDamageStore, PgEventStore, PgLockerStore, PgOtpStore, PgProfileDirectory, PgSessionStore,
    PgToolStore,
};
use toolrack_database::{DatabasePool, MemoryBackend};
use toolrack_telegram::{NoopMessenger, TelegramClient};

#[tokio::main]
async fn main() {
    let env = std::env::var("TOOLRACK_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ToolRack v{}", env!("CARGO_PKG_VERSION"));

    let stores = build_stores(&config).await?;

    let messenger: Arc<dyn Messenger> = if config.telegram.enabled {
        Arc::new(TelegramClient::new(&config.telegram)?)
    } else {
        tracing::warn!("Telegram delivery disabled; OTP issuance will fail");
        Arc::new(NoopMessenger)
    };

    let config = Arc::new(config);
    let state = AppState::new(Arc::clone(&config), stores, messenger);
    let router = toolrack_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Build the store set for the configured backend.
async fn build_stores(config: &AppConfig) -> Result<StoreSet, AppError> {
    match config.database.backend.as_str() {
        "memory" => {
            tracing::warn!("Using in-memory store backend; data is not persisted");
            let backend = Arc::new(MemoryBackend::new());
            Ok(StoreSet {
                lockers: backend.clone(),
                tools: backend.clone(),
                sessions: backend.clone(),
                damage: backend.clone(),
                events: backend.clone(),
                profiles: backend.clone(),
                otps: backend.clone(),
                health: backend,
            })
        }
        _ => {
            tracing::info!("Connecting to database...");
            let db = Arc::new(DatabasePool::connect(&config.database).await?);
            toolrack_database::migration::run_migrations(db.pool()).await?;
            let pool = db.pool().clone();
            Ok(StoreSet {
                lockers: Arc::new(PgLockerStore::new(pool.clone())),
                tools: Arc::new(PgToolStore::new(pool.clone())),
                sessions: Arc::new(PgSessionStore::new(pool.clone())),
                damage: Arc::new(PgDamageStore::new(pool.clone())),
                events: Arc::new(PgEventStore::new(pool.clone())),
                profiles: Arc::new(PgProfileDirectory::new(pool.clone())),
                otps: Arc::new(PgOtpStore::new(pool)),
                health: db,
            })
        }
    }
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
