//! Locker handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use toolrack_core::types::pagination::{PageRequest, PageResponse};
use toolrack_entity::locker::LockerEvent;
use toolrack_service::{CheckinOutcome, CheckoutOutcome, LockerView};

use crate::dto::request::{CheckinRequest, CheckoutRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/lockers/{code}
pub async fn get_locker(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<ApiResponse<LockerView>>> {
    let view = state.lockers.view(&code).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// POST /api/lockers/{code}/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<ApiResponse<CheckoutOutcome>>> {
    let outcome = state.lockers.checkout(&code, &req.nik, &req.tool_ids).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/lockers/{code}/checkin
pub async fn checkin(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<CheckinRequest>,
) -> ApiResult<Json<ApiResponse<CheckinOutcome>>> {
    let outcome = state
        .lockers
        .checkin(&code, &req.nik, &req.tool_ids, &req.damaged)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/lockers/{code}/history
pub async fn history(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<ApiResponse<PageResponse<LockerEvent>>>> {
    let page = page.clamped();
    let locker = state.lockers.resolve(&code).await?;
    let events = state
        .lockers
        .history()
        .locker_history(locker.id, &page)
        .await?;
    Ok(Json(ApiResponse::ok(events)))
}

/// POST /api/admin/lockers/{code}/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.lockers.deactivate(&code).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Locker dinonaktifkan.",
    ))))
}
