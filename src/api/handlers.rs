//! API Handlers
//!
//! HTTP request handlers for the OTP endpoints and the health check.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::{HealthResponse, SendOtpRequest, StatusResponse, VerifyOtpRequest};
use crate::otp::OtpService;

/// Application state shared across all handlers.
///
/// Holds no mutable state of its own; pending codes live in the store the
/// service was built with.
#[derive(Clone)]
pub struct AppState {
    pub otp: Arc<OtpService>,
}

impl AppState {
    pub fn new(otp: OtpService) -> Self {
        Self { otp: Arc::new(otp) }
    }
}

/// Handler for POST /api/send-otp/
///
/// Issues a fresh code to the given email, replacing any pending one.
pub async fn send_otp_handler(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<StatusResponse>> {
    state.otp.issue(req.email.as_deref()).await?;
    Ok(Json(StatusResponse::success("OTP sent to email")))
}

/// Handler for POST /api/verify-otp/
///
/// Consumes the pending code for the email if it matches and has not expired.
pub async fn verify_otp_handler(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<StatusResponse>> {
    state
        .otp
        .verify(req.email.as_deref(), req.otp.as_deref())
        .await?;
    Ok(Json(StatusResponse::success("OTP verified successfully")))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
