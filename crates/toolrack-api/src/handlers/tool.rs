//! Per-tool handlers.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};

use toolrack_core::types::pagination::{PageRequest, PageResponse};
use toolrack_entity::tool::{Tool, ToolAction, ToolEvent};

use crate::dto::request::ToolActionRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/tools/{slug}
pub async fn get_tool(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<Tool>>> {
    let tool = state.tools.get(&slug).await?;
    Ok(Json(ApiResponse::ok(tool)))
}

/// POST /api/tools/{slug}/action
pub async fn action(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<ToolActionRequest>,
) -> ApiResult<Json<ApiResponse<Tool>>> {
    let action = ToolAction::from_str(&req.action)?;
    let tool = state
        .tools
        .act(&slug, action, &req.nik, req.note.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(tool)))
}

/// GET /api/tools/{slug}/history
pub async fn history(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<ApiResponse<PageResponse<ToolEvent>>>> {
    let page = page.clamped();
    let tool = state.tools.get(&slug).await?;
    let events = state.tools.history().tool_history(tool.id, &page).await?;
    Ok(Json(ApiResponse::ok(events)))
}
