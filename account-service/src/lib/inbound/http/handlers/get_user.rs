use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::User;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .account_service
        .get_user(&identity.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "User found", user.into()))
}

/// Public profile projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub fullname: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub is_verified: bool,
}

impl From<&User> for ProfileData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.to_string(),
            email: user.email.to_string(),
            fullname: user.fullname.as_ref().map(|f| f.as_str().to_string()),
            bio: user.bio.as_ref().map(|b| b.as_str().to_string()),
            image: user.image.clone(),
            is_verified: user.is_verified,
        }
    }
}
