use std::sync::Arc;

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
use crate::content::ports::ContentRepository;
use crate::content::ports::ContentServicePort;
use crate::domain::account::models::UserId;
use crate::domain::authorization::ensure_owner;
use crate::domain::authorization::Owned;
use crate::domain::media::ImageStore;
use crate::domain::media::ImageUpload;

impl Owned for Content {
    fn owner_id(&self) -> UserId {
        self.user_id
    }
}

/// Domain service implementation for the content feed.
pub struct ContentService<CR, IS>
where
    CR: ContentRepository,
    IS: ImageStore,
{
    repository: Arc<CR>,
    images: Arc<IS>,
}

impl<CR, IS> ContentService<CR, IS>
where
    CR: ContentRepository,
    IS: ImageStore,
{
    pub fn new(repository: Arc<CR>, images: Arc<IS>) -> Self {
        Self { repository, images }
    }

    async fn load(&self, id: &ContentId) -> Result<Content, ContentError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(id.to_string()))
    }

    async fn store_image(&self, image: ImageUpload) -> Result<String, ContentError> {
        image.validate()?;
        Ok(self.images.store(image).await?)
    }
}

#[async_trait]
impl<CR, IS> ContentServicePort for ContentService<CR, IS>
where
    CR: ContentRepository,
    IS: ImageStore,
{
    async fn add_content(
        &self,
        actor: &UserId,
        command: AddContentCommand,
    ) -> Result<Content, ContentError> {
        let image = command.image.ok_or(ContentError::ImageRequired)?;
        let image = self.store_image(image).await?;

        let content = self
            .repository
            .insert(NewContent {
                user_id: *actor,
                caption: command.caption,
                image,
            })
            .await?;

        tracing::info!(content_id = %content.id, user_id = %actor, "Content added");
        Ok(content)
    }

    async fn list_content(&self) -> Result<Vec<Content>, ContentError> {
        self.repository.list_all().await
    }

    async fn list_content_page(&self, page: Page) -> Result<Vec<Content>, ContentError> {
        self.repository.list_page(page).await
    }

    async fn my_content(&self, actor: &UserId) -> Result<Vec<Content>, ContentError> {
        self.repository.list_by_user(actor).await
    }

    async fn get_content(&self, id: &ContentId) -> Result<Content, ContentError> {
        self.load(id).await
    }

    async fn edit_content(
        &self,
        actor: &UserId,
        id: &ContentId,
        command: EditContentCommand,
    ) -> Result<Content, ContentError> {
        let content = self.load(id).await?;
        ensure_owner(*actor, &content)?;

        let image = match command.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        self.repository
            .update(
                id,
                ContentChanges {
                    caption: command.caption,
                    image,
                },
            )
            .await
    }

    async fn delete_content(&self, actor: &UserId, id: &ContentId) -> Result<(), ContentError> {
        let content = self.load(id).await?;
        ensure_owner(*actor, &content)?;

        self.repository.delete(id).await?;
        tracing::info!(content_id = %id, user_id = %actor, "Content deleted");
        Ok(())
    }

    async fn like_content(&self, actor: &UserId, id: &ContentId) -> Result<(), ContentError> {
        self.load(id).await?;
        self.repository.insert_like(actor, id).await
    }

    async fn comment_on_content(
        &self,
        actor: &UserId,
        id: &ContentId,
        text: CommentText,
    ) -> Result<Comment, ContentError> {
        self.load(id).await?;
        self.repository
            .insert_comment(NewComment {
                user_id: *actor,
                content_id: *id,
                text,
            })
            .await
    }

    async fn list_comments(&self, id: &ContentId) -> Result<Vec<Comment>, ContentError> {
        self.load(id).await?;
        self.repository.list_comments(id).await
    }

    async fn list_likes(&self, id: &ContentId) -> Result<Vec<Like>, ContentError> {
        self.load(id).await?;
        self.repository.list_likes(id).await
    }
}
