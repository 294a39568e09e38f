//! Admin OTP handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{OtpRequest, OtpVerifyRequest};
use crate::dto::response::{ApiResponse, MessageResponse, OtpVerifyResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/otp/request
pub async fn request_code(
    State(state): State<AppState>,
    Json(req): Json<OtpRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.otp.request_code(&req.nik).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Kode OTP dikirim via Telegram.",
    ))))
}

/// POST /api/otp/verify
pub async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<OtpVerifyRequest>,
) -> ApiResult<Json<ApiResponse<OtpVerifyResponse>>> {
    let profile = state.otp.verify_code(&req.nik, &req.code).await?;
    Ok(Json(ApiResponse::ok(OtpVerifyResponse {
        nik: profile.nik,
        name: profile.name,
        role: profile.role.map(|r| r.as_str().to_string()),
    })))
}
