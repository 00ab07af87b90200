use async_trait::async_trait;

use crate::content::errors::ContentError;
use crate::content::models::AddContentCommand;
use crate::content::models::Comment;
use crate::content::models::CommentText;
use crate::content::models::Content;
use crate::content::models::ContentChanges;
use crate::content::models::ContentId;
use crate::content::models::EditContentCommand;
use crate::content::models::Like;
use crate::content::models::NewComment;
use crate::content::models::NewContent;
use crate::content::models::Page;
use crate::domain::account::models::UserId;

/// Port for content feed operations.
///
/// Every mutation takes the acting identity resolved from a session token.
#[async_trait]
pub trait ContentServicePort: Send + Sync + 'static {
    /// Publish a post. The image is mandatory.
    ///
    /// # Errors
    /// * `ImageRequired` - No image supplied
    /// * `Image` - Image rejected or could not be stored
    async fn add_content(
        &self,
        actor: &UserId,
        command: AddContentCommand,
    ) -> Result<Content, ContentError>;

    /// All posts, newest first.
    async fn list_content(&self) -> Result<Vec<Content>, ContentError>;

    /// One window of posts, newest first.
    async fn list_content_page(&self, page: Page) -> Result<Vec<Content>, ContentError>;

    /// Posts authored by `actor`, newest first.
    async fn my_content(&self, actor: &UserId) -> Result<Vec<Content>, ContentError>;

    /// # Errors
    /// * `NotFound` - Content does not exist
    async fn get_content(&self, id: &ContentId) -> Result<Content, ContentError>;

    /// Partially update a post.
    ///
    /// # Errors
    /// * `NotFound` - Content does not exist
    /// * `Forbidden` - `actor` is not the author
    async fn edit_content(
        &self,
        actor: &UserId,
        id: &ContentId,
        command: EditContentCommand,
    ) -> Result<Content, ContentError>;

    /// # Errors
    /// * `NotFound` - Content does not exist
    /// * `Forbidden` - `actor` is not the author
    async fn delete_content(&self, actor: &UserId, id: &ContentId) -> Result<(), ContentError>;

    /// # Errors
    /// * `NotFound` - Content does not exist
    /// * `AlreadyLiked` - `actor` already likes this post
    async fn like_content(&self, actor: &UserId, id: &ContentId) -> Result<(), ContentError>;

    /// # Errors
    /// * `NotFound` - Content does not exist
    async fn comment_on_content(
        &self,
        actor: &UserId,
        id: &ContentId,
        text: CommentText,
    ) -> Result<Comment, ContentError>;

    /// # Errors
    /// * `NotFound` - Content does not exist
    async fn list_comments(&self, id: &ContentId) -> Result<Vec<Comment>, ContentError>;

    /// # Errors
    /// * `NotFound` - Content does not exist
    async fn list_likes(&self, id: &ContentId) -> Result<Vec<Like>, ContentError>;
}

/// Persistence operations for posts, likes and comments.
#[async_trait]
pub trait ContentRepository: Send + Sync + 'static {
    async fn insert(&self, content: NewContent) -> Result<Content, ContentError>;

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, ContentError>;

    async fn list_all(&self) -> Result<Vec<Content>, ContentError>;

    async fn list_page(&self, page: Page) -> Result<Vec<Content>, ContentError>;

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Content>, ContentError>;

    /// # Errors
    /// * `NotFound` - No row with this id
    async fn update(
        &self,
        id: &ContentId,
        changes: ContentChanges,
    ) -> Result<Content, ContentError>;

    /// Remove a post together with its likes and comments.
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    async fn delete(&self, id: &ContentId) -> Result<(), ContentError>;

    /// # Errors
    /// * `AlreadyLiked` - The (user, content) pair already exists
    async fn insert_like(&self, user_id: &UserId, id: &ContentId) -> Result<(), ContentError>;

    async fn list_likes(&self, id: &ContentId) -> Result<Vec<Like>, ContentError>;

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, ContentError>;

    async fn list_comments(&self, id: &ContentId) -> Result<Vec<Comment>, ContentError>;
}
