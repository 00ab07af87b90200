use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::LikeData;
use crate::content::models::ContentId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn like_content(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path(id): Path<ContentId>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .content_service
        .like_content(&identity.user_id, &id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::CREATED, "Content liked successfully", ()))
}

pub async fn show_likes(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<ApiSuccess<Vec<LikeData>>, ApiError> {
    state
        .content_service
        .list_likes(&id)
        .await
        .map_err(ApiError::from)
        .map(|likes| {
            ApiSuccess::new(
                StatusCode::OK,
                "Likes retrieved",
                likes.iter().map(LikeData::from).collect(),
            )
        })
}
