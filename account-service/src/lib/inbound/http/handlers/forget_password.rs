use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::resend_verification::EmailRequest;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn forget_password(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .account_service
        .forget_password(&body.email)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, "Password reset email sent", ()))
}
