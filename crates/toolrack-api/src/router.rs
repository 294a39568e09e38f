//! Route definitions for the ToolRack HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(locker_routes())
        .merge(tool_routes())
        .merge(otp_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Locker detail, custody flows, history, and the admin soft-delete.
fn locker_routes() -> Router<AppState> {
    Router::new()
        .route("/lockers/{code}", get(handlers::locker::get_locker))
        .route("/lockers/{code}/checkout", post(handlers::locker::checkout))
        .route("/lockers/{code}/checkin", post(handlers::locker::checkin))
        .route("/lockers/{code}/history", get(handlers::locker::history))
        .route(
            "/admin/lockers/{code}/deactivate",
            post(handlers::locker::deactivate),
        )
}

/// Per-tool (QR scan) endpoints.
fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/tools/{slug}", get(handlers::tool::get_tool))
        .route("/tools/{slug}/action", post(handlers::tool::action))
        .route("/tools/{slug}/history", get(handlers::tool::history))
}

/// Admin OTP login endpoints.
fn otp_routes() -> Router<AppState> {
    Router::new()
        .route("/otp/request", post(handlers::otp::request_code))
        .route("/otp/verify", post(handlers::otp::verify_code))
}

/// Health check endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
