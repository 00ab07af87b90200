use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::CommentData;
use crate::content::errors::ContentError;
use crate::content::models::CommentText;
use crate::content::models::ContentId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentRequest {
    comment: String,
}

pub async fn comment_on_content(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path(id): Path<ContentId>,
    Json(body): Json<CommentRequest>,
) -> Result<ApiSuccess<CommentData>, ApiError> {
    let text = CommentText::new(body.comment).map_err(ContentError::from)?;

    state
        .content_service
        .comment_on_content(&identity.user_id, &id, text)
        .await
        .map_err(ApiError::from)
        .map(|ref comment| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "Comment created successfully",
                comment.into(),
            )
        })
}

pub async fn show_comments(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<ApiSuccess<Vec<CommentData>>, ApiError> {
    state
        .content_service
        .list_comments(&id)
        .await
        .map_err(ApiError::from)
        .map(|comments| {
            ApiSuccess::new(
                StatusCode::OK,
                "Comments retrieved",
                comments.iter().map(CommentData::from).collect(),
            )
        })
}
