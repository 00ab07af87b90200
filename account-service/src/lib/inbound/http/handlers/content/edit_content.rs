use axum::extract::Multipart;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ContentData;
use crate::content::errors::ContentError;
use crate::content::models::Caption;
use crate::content::models::ContentId;
use crate::content::models::EditContentCommand;
use crate::inbound::http::handlers::multipart::FormData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn edit_content(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path(id): Path<ContentId>,
    multipart: Multipart,
) -> Result<ApiSuccess<ContentData>, ApiError> {
    let mut form = FormData::read(multipart, "image").await?;
    let command = EditContentCommand {
        caption: form
            .text("caption")
            .map(Caption::new)
            .transpose()
            .map_err(ContentError::from)?,
        image: form.image.take(),
    };

    state
        .content_service
        .edit_content(&identity.user_id, &id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref content| {
            ApiSuccess::new(StatusCode::OK, "Content updated successfully", content.into())
        })
}
