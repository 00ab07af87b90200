use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::errors::AccountError;
use crate::account::errors::PasswordPolicyError;
use crate::content::errors::ContentError;
use crate::domain::media::ImageStoreError;

pub mod content;
pub mod edit_user;
pub mod forget_password;
pub mod get_user;
pub mod health;
pub mod login;
pub mod multipart;
pub mod register;
pub mod resend_verification;
pub mod reset_password;
pub mod verify_account;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    /// Malformed input, tagged with the offending field.
    Validation {
        field: &'static str,
        message: String,
    },
    /// Uniqueness conflict naming every colliding field.
    Conflict {
        fields: Vec<String>,
        message: String,
    },
    NotFound(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl ToString) -> Self {
        ApiError::Validation {
            field,
            message: message.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Validation { field, message } => {
                (StatusCode::BAD_REQUEST, message, Some(vec![field.to_string()]))
            }
            ApiError::Conflict { fields, message } => {
                (StatusCode::BAD_REQUEST, message, Some(fields))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
        };

        (
            status,
            Json(ApiErrorBody {
                status_code: status.as_u16(),
                message,
                fields,
            }),
        )
            .into_response()
    }
}

fn image_error(err: ImageStoreError) -> ApiError {
    match err {
        ImageStoreError::WriteFailed(_) => ApiError::InternalServerError(err.to_string()),
        _ => ApiError::validation("image", err),
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidUsername(_) => ApiError::validation("username", err),
            AccountError::InvalidEmail(_) => ApiError::validation("email", err),
            AccountError::InvalidPassword(PasswordPolicyError::ConfirmationMismatch) => {
                ApiError::validation("confirmPassword", err)
            }
            AccountError::InvalidPassword(_) => ApiError::validation("password", err),
            AccountError::InvalidFullname(_) => ApiError::validation("fullname", err),
            AccountError::InvalidBio(_) => ApiError::validation("bio", err),
            AccountError::Image(e) => image_error(e),
            AccountError::AlreadyExists(ref fields) => ApiError::Conflict {
                fields: fields.iter().map(|f| f.to_string()).collect(),
                message: err.to_string(),
            },
            AccountError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            AccountError::EmailNotFound(_) => {
                ApiError::NotFound("No account registered with this email".to_string())
            }
            AccountError::AlreadyVerified => ApiError::BadRequest(err.to_string()),
            AccountError::InvalidCredentials | AccountError::NotVerified => {
                ApiError::Unauthorized(err.to_string())
            }
            AccountError::Forbidden(_) => ApiError::Unauthorized(
                "You are not authorized to modify this account".to_string(),
            ),
            AccountError::Token(_) | AccountError::InvalidUserId(_) => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AccountError::Hashing(_) | AccountError::DatabaseError(_) | AccountError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::InvalidCaption(_) => ApiError::validation("caption", err),
            ContentError::InvalidComment(_) => ApiError::validation("comment", err),
            ContentError::InvalidPage(_) => ApiError::BadRequest(err.to_string()),
            ContentError::ImageRequired => ApiError::validation("image", err),
            ContentError::Image(e) => image_error(e),
            ContentError::NotFound(_) => ApiError::NotFound("Content not found".to_string()),
            ContentError::AlreadyLiked => ApiError::BadRequest(err.to_string()),
            ContentError::Forbidden(_) => ApiError::Unauthorized(err.to_string()),
            ContentError::DatabaseError(_) | ContentError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    message: String,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}
