use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::content::add_content::add_content;
use super::handlers::content::comments::comment_on_content;
use super::handlers::content::comments::show_comments;
use super::handlers::content::delete_content::delete_content;
use super::handlers::content::edit_content::edit_content;
use super::handlers::content::likes::like_content;
use super::handlers::content::likes::show_likes;
use super::handlers::content::list_content::all_content;
use super::handlers::content::list_content::get_content;
use super::handlers::content::list_content::infinite_scroll;
use super::handlers::content::list_content::my_content;
use super::handlers::edit_user::edit_user;
use super::handlers::forget_password::forget_password;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::resend_verification::resend_verification;
use super::handlers::reset_password::reset_password;
use super::handlers::verify_account::verify_account;
use super::middleware::require_reset_token;
use super::middleware::require_session;
use super::middleware::require_verification_token;
use crate::account::ports::AccountServicePort;
use crate::content::ports::ContentServicePort;

/// Upper bound for multipart uploads.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub content_service: Arc<dyn ContentServicePort>,
    pub tokens: Arc<TokenService>,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    content_service: Arc<dyn ContentServicePort>,
    tokens: Arc<TokenService>,
    uploads_dir: impl Into<PathBuf>,
) -> Router {
    let state = AppState {
        account_service,
        content_service,
        tokens,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth", post(register))
        .route("/auth/login", post(login))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/forget-password", post(forget_password))
        .route("/content/all-content", get(all_content))
        .route("/content/infinite-scroll", get(infinite_scroll))
        .route("/content/:id", get(get_content))
        .route("/content/contents/:id/show-comments", get(show_comments))
        .route("/content/contents/:id/show-likes", get(show_likes));

    let session_routes = Router::new()
        .route("/auth/get-user", get(get_user))
        .route("/auth/edit-user", post(edit_user))
        .route("/content/add-content", post(add_content))
        .route("/content/my-post", get(my_content))
        .route("/content/edit-content/:id", post(edit_content))
        .route("/content/del-contents/:id", delete(delete_content))
        .route("/content/contents/:id/like", post(like_content))
        .route("/content/contents/:id/comments", post(comment_on_content))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let verification_routes = Router::new()
        .route("/auth/verification", post(verify_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_verification_token,
        ));

    let reset_routes = Router::new()
        .route("/auth/reset-password", post(reset_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_reset_token,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(verification_routes)
        .merge(reset_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir.into()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
