//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use toolrack_api::build_router;
use toolrack_api::state::{AppState, StoreSet};
use toolrack_core::config::AppConfig;
use toolrack_core::result::AppResult;
use toolrack_core::traits::messenger::Messenger;
use toolrack_database::MemoryBackend;
use toolrack_entity::locker::Locker;
use toolrack_entity::profile::Role;

/// Messenger that records every OTP message instead of sending it.
#[derive(Default)]
pub struct CapturingMessenger {
    /// Captured (chat_id, text) pairs.
    pub sent: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl Messenger for CapturingMessenger {
    async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.sent.lock().await.push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// The in-memory backend, for seeding and direct inspection.
    pub backend: Arc<MemoryBackend>,
    /// OTP message sink.
    pub messenger: Arc<CapturingMessenger>,
}

/// Decoded response from a test request.
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body (`Null` when empty).
    pub body: Value,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory backend.
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let messenger = Arc::new(CapturingMessenger::default());

        let config = Arc::new(AppConfig {
            server: Default::default(),
            database: Default::default(),
            telegram: Default::default(),
            otp: Default::default(),
            logging: Default::default(),
        });

        let stores = StoreSet {
            lockers: backend.clone(),
            tools: backend.clone(),
            sessions: backend.clone(),
            damage: backend.clone(),
            events: backend.clone(),
            profiles: backend.clone(),
            otps: backend.clone(),
            health: backend.clone(),
        };

        let state = AppState::new(config, stores, messenger.clone());
        Self {
            router: build_router(state),
            backend,
            messenger,
        }
    }

    /// Seed an active technician profile.
    pub async fn seed_tech(&self, nik: &str) {
        self.backend
            .seed_profile(nik, Some(Role::Tech), true, None)
            .await;
    }

    /// Seed an admin profile with a Telegram chat.
    pub async fn seed_admin(&self, nik: &str, chat_id: i64) {
        self.backend
            .seed_profile(nik, Some(Role::Admin), true, Some(chat_id))
            .await;
    }

    /// Seed a locker with `n` tools; returns the locker and tool ids.
    pub async fn seed_locker_with_tools(&self, code: &str, n: usize) -> (Locker, Vec<i64>) {
        let locker = self.backend.seed_locker(code, "Rak Uji").await;
        let mut ids = Vec::new();
        for i in 0..n {
            let tool = self
                .backend
                .seed_tool(locker.id, &format!("Tool {i}"), &format!("{code}-tool-{i}"))
                .await;
            ids.push(tool.id);
        }
        (locker, ids)
    }

    /// Issue a request against the router and decode the JSON body.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is not JSON")
        };

        TestResponse { status, body }
    }
}
