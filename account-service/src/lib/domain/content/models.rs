use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::content::errors::CaptionError;
use crate::content::errors::CommentError;
use crate::content::errors::PageError;
use crate::domain::account::models::UserId;
use crate::domain::media::ImageUpload;

/// Content unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub i64);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A post in the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub id: ContentId,
    pub user_id: UserId,
    /// Author's current username.
    pub username: String,
    pub caption: Caption,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Post caption, 1-200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    const MAX_LENGTH: usize = 200;

    pub fn new(caption: String) -> Result<Self, CaptionError> {
        let length = caption.chars().count();
        if caption.trim().is_empty() {
            Err(CaptionError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(CaptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(caption))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Comment body, 1-500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    const MAX_LENGTH: usize = 500;

    pub fn new(text: String) -> Result<Self, CommentError> {
        let text = text.trim().to_string();
        let length = text.chars().count();
        if length == 0 {
            Err(CommentError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(CommentError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    pub user_id: UserId,
    pub username: String,
    pub content_id: ContentId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub user_id: UserId,
    pub username: String,
    pub content_id: ContentId,
    pub text: CommentText,
    pub created_at: DateTime<Utc>,
}

/// Window into the feed for infinite scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 50;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, PageError> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);

        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(PageError::InvalidLimit {
                max: Self::MAX_LIMIT,
                actual: limit,
            });
        }
        if offset < 0 {
            return Err(PageError::NegativeOffset(offset));
        }

        Ok(Self { limit, offset })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContent {
    pub user_id: UserId,
    pub caption: Caption,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub user_id: UserId,
    pub content_id: ContentId,
    pub text: CommentText,
}

/// Column changes for a partial content update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentChanges {
    pub caption: Option<Caption>,
    pub image: Option<String>,
}

#[derive(Debug)]
pub struct AddContentCommand {
    pub caption: Caption,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Default)]
pub struct EditContentCommand {
    pub caption: Option<Caption>,
    pub image: Option<ImageUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_bounds() {
        assert_eq!(Caption::new("   ".to_string()), Err(CaptionError::Empty));
        assert!(Caption::new("x".repeat(200)).is_ok());
        assert!(Caption::new("x".repeat(201)).is_err());
    }

    #[test]
    fn test_comment_bounds() {
        assert_eq!(CommentText::new(String::new()), Err(CommentError::Empty));
        assert_eq!(CommentText::new(" nice ".to_string()).unwrap().as_str(), "nice");
        assert!(CommentText::new("x".repeat(501)).is_err());
    }

    #[test]
    fn test_page_defaults_and_limits() {
        assert_eq!(Page::new(None, None), Ok(Page { limit: 10, offset: 0 }));
        assert_eq!(Page::new(Some(50), Some(100)), Ok(Page { limit: 50, offset: 100 }));
        assert!(Page::new(Some(51), None).is_err());
        assert!(Page::new(Some(0), None).is_err());
        assert_eq!(Page::new(None, Some(-1)), Err(PageError::NegativeOffset(-1)));
    }
}
