use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ContentData;
use crate::content::errors::ContentError;
use crate::content::models::AddContentCommand;
use crate::content::models::Caption;
use crate::inbound::http::handlers::multipart::FormData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Publish a post from `multipart/form-data` (`caption`, file `image`).
pub async fn add_content(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<ApiSuccess<ContentData>, ApiError> {
    let mut form = FormData::read(multipart, "image").await?;
    let caption = Caption::new(form.text("caption").unwrap_or_default())
        .map_err(ContentError::from)?;
    let command = AddContentCommand {
        caption,
        image: form.image.take(),
    };

    state
        .content_service
        .add_content(&identity.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref content| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "Content added successfully",
                content.into(),
            )
        })
}
