//! # toolrack-api
//!
//! HTTP API layer for ToolRack. Defines the Axum router, request and
//! response DTOs, the `AppError` to HTTP status mapping, and request
//! logging middleware. All routes are mounted under `/api`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
