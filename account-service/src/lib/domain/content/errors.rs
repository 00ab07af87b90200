use thiserror::Error;

use crate::domain::authorization::OwnershipError;
use crate::domain::media::ImageStoreError;

/// Error for Caption validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptionError {
    #[error("Caption is required")]
    Empty,

    #[error("Caption too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for CommentText validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("Comment is required")]
    Empty,

    #[error("Comment too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for pagination parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Limit must be between 1 and {max}, got {actual}")]
    InvalidLimit { max: i64, actual: i64 },

    #[error("Offset must not be negative, got {0}")]
    NegativeOffset(i64),
}

/// Top-level error for content feed operations
#[derive(Debug, Clone, Error)]
pub enum ContentError {
    #[error("Invalid caption: {0}")]
    InvalidCaption(#[from] CaptionError),

    #[error("Invalid comment: {0}")]
    InvalidComment(#[from] CommentError),

    #[error("Invalid page: {0}")]
    InvalidPage(#[from] PageError),

    #[error("Image is required")]
    ImageRequired,

    #[error("Invalid image: {0}")]
    Image(#[from] ImageStoreError),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("You have already liked this content")]
    AlreadyLiked,

    #[error("You are not authorized to modify this content")]
    Forbidden(#[from] OwnershipError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        ContentError::Unknown(err.to_string())
    }
}
