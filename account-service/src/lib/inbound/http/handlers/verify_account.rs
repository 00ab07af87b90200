use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::get_user::ProfileData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Consume an email verification token presented as the bearer credential.
pub async fn verify_account(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .account_service
        .verify_account(&identity.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "Account verified", user.into()))
}
