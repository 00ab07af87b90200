use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::content::models::Comment;
use crate::content::models::Content;
use crate::content::models::Like;

pub mod add_content;
pub mod comments;
pub mod delete_content;
pub mod edit_content;
pub mod likes;
pub mod list_content;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentData {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub caption: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Content> for ContentData {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id.0,
            user_id: content.user_id.0,
            username: content.username.clone(),
            caption: content.caption.as_str().to_string(),
            image: content.image.clone(),
            created_at: content.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentData {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub content_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentData {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id.0,
            username: comment.username.clone(),
            content_id: comment.content_id.0,
            comment: comment.text.as_str().to_string(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeData {
    pub user_id: i64,
    pub username: String,
    pub content_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Like> for LikeData {
    fn from(like: &Like) -> Self {
        Self {
            user_id: like.user_id.0,
            username: like.username.clone(),
            content_id: like.content_id.0,
            created_at: like.created_at,
        }
    }
}
