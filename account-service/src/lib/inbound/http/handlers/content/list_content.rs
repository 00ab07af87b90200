use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ContentData;
use crate::content::errors::ContentError;
use crate::content::models::Content;
use crate::content::models::ContentId;
use crate::content::models::Page;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

fn to_data(contents: Vec<Content>) -> Vec<ContentData> {
    contents.iter().map(ContentData::from).collect()
}

pub async fn all_content(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ContentData>>, ApiError> {
    state
        .content_service
        .list_content()
        .await
        .map_err(ApiError::from)
        .map(|contents| ApiSuccess::new(StatusCode::OK, "Content retrieved", to_data(contents)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// Offset-paginated feed for infinite scrolling.
pub async fn infinite_scroll(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ApiSuccess<Vec<ContentData>>, ApiError> {
    let page = Page::new(query.limit, query.offset).map_err(ContentError::from)?;

    state
        .content_service
        .list_content_page(page)
        .await
        .map_err(ApiError::from)
        .map(|contents| ApiSuccess::new(StatusCode::OK, "Content retrieved", to_data(contents)))
}

pub async fn my_content(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<ContentData>>, ApiError> {
    state
        .content_service
        .my_content(&identity.user_id)
        .await
        .map_err(ApiError::from)
        .map(|contents| ApiSuccess::new(StatusCode::OK, "Content retrieved", to_data(contents)))
}

pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<ApiSuccess<ContentData>, ApiError> {
    state
        .content_service
        .get_content(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref content| ApiSuccess::new(StatusCode::OK, "Content found", content.into()))
}
