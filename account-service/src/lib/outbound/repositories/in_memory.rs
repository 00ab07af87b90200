//! Process-local repositories with the same uniqueness rules as the
//! Postgres schema. Used when no database is configured and by the HTTP
//! test suite.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::errors::UniqueField;
use crate::content::errors::ContentError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::PasswordHash;
use crate::domain::account::models::ProfileChanges;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;
use crate::domain::content::models::Comment;
use crate::domain::content::models::Content;
use crate::domain::content::models::ContentChanges;
use crate::domain::content::models::ContentId;
use crate::domain::content::models::Like;
use crate::domain::content::models::NewComment;
use crate::domain::content::models::NewContent;
use crate::domain::content::models::Page;
use crate::domain::content::ports::ContentRepository;

#[derive(Default)]
struct AccountTable {
    next_id: i64,
    users: HashMap<UserId, User>,
}

impl AccountTable {
    fn get_mut(&mut self, id: &UserId) -> Result<&mut User, AccountError> {
        self.users
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }
}

#[derive(Default, Clone)]
pub struct InMemoryAccountRepository {
    table: Arc<RwLock<AccountTable>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current username of an account, if it exists.
    pub async fn username_of(&self, id: &UserId) -> Option<String> {
        let table = self.table.read().await;
        table.users.get(id).map(|u| u.username.to_string())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let table = self.table.read().await;
        Ok(table
            .users
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError> {
        let table = self.table.read().await;
        Ok(table
            .users
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_email_or_username(
        &self,
        email: &EmailAddress,
        username: &Username,
    ) -> Result<Vec<User>, AccountError> {
        let table = self.table.read().await;
        Ok(table
            .users
            .values()
            .filter(|u| &u.email == email || &u.username == username)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        let table = self.table.read().await;
        Ok(table.users.get(id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AccountError> {
        let mut table = self.table.write().await;

        if table.users.values().any(|u| u.email == user.email) {
            return Err(AccountError::AlreadyExists(vec![UniqueField::Email]));
        }
        if table.users.values().any(|u| u.username == user.username) {
            return Err(AccountError::AlreadyExists(vec![UniqueField::Username]));
        }

        table.next_id += 1;
        let stored = User {
            id: UserId(table.next_id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            fullname: user.fullname,
            bio: user.bio,
            image: None,
            is_verified: false,
            verification_token: None,
            reset_password_token: None,
            created_at: Utc::now(),
        };
        table.users.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn update_verification(&self, id: &UserId, verified: bool) -> Result<(), AccountError> {
        let mut table = self.table.write().await;
        table.get_mut(id)?.is_verified = verified;
        Ok(())
    }

    async fn update_reset_token(
        &self,
        id: &UserId,
        token: Option<String>,
    ) -> Result<(), AccountError> {
        let mut table = self.table.write().await;
        table.get_mut(id)?.reset_password_token = token;
        Ok(())
    }

    async fn update_verification_token(
        &self,
        id: &UserId,
        token: Option<String>,
    ) -> Result<(), AccountError> {
        let mut table = self.table.write().await;
        table.get_mut(id)?.verification_token = token;
        Ok(())
    }

    async fn update_password(&self, id: &UserId, hash: PasswordHash) -> Result<(), AccountError> {
        let mut table = self.table.write().await;
        table.get_mut(id)?.password_hash = hash;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, AccountError> {
        let mut table = self.table.write().await;

        if let Some(username) = &changes.username {
            if table
                .users
                .values()
                .any(|u| &u.username == username && u.id != *id)
            {
                return Err(AccountError::AlreadyExists(vec![UniqueField::Username]));
            }
        }

        let user = table.get_mut(id)?;
        changes.apply_to(user);
        Ok(user.clone())
    }
}

struct StoredContent {
    user_id: UserId,
    caption: crate::domain::content::models::Caption,
    image: String,
    created_at: DateTime<Utc>,
}

struct StoredComment {
    id: i64,
    user_id: UserId,
    content_id: ContentId,
    text: crate::domain::content::models::CommentText,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct ContentTable {
    next_content_id: i64,
    next_comment_id: i64,
    contents: BTreeMap<ContentId, StoredContent>,
    likes: BTreeMap<(ContentId, UserId), DateTime<Utc>>,
    comments: Vec<StoredComment>,
}

/// Content store that resolves author names through the account store, the
/// way the SQL adapter joins on `users`.
#[derive(Clone)]
pub struct InMemoryContentRepository {
    accounts: InMemoryAccountRepository,
    table: Arc<RwLock<ContentTable>>,
}

impl InMemoryContentRepository {
    pub fn new(accounts: InMemoryAccountRepository) -> Self {
        Self {
            accounts,
            table: Arc::new(RwLock::new(ContentTable::default())),
        }
    }

    async fn username(&self, id: &UserId) -> String {
        self.accounts.username_of(id).await.unwrap_or_default()
    }

    async fn hydrate(&self, id: ContentId, stored: &StoredContent) -> Content {
        Content {
            id,
            user_id: stored.user_id,
            username: self.username(&stored.user_id).await,
            caption: stored.caption.clone(),
            image: stored.image.clone(),
            created_at: stored.created_at,
        }
    }

    /// Newest first, optionally filtered by author.
    async fn collect(&self, author: Option<&UserId>) -> Vec<Content> {
        let table = self.table.read().await;
        let mut contents = Vec::new();
        for (id, stored) in table.contents.iter().rev() {
            if author.map_or(true, |a| *a == stored.user_id) {
                contents.push(self.hydrate(*id, stored).await);
            }
        }
        contents
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn insert(&self, content: NewContent) -> Result<Content, ContentError> {
        let mut table = self.table.write().await;
        table.next_content_id += 1;
        let id = ContentId(table.next_content_id);

        let stored = StoredContent {
            user_id: content.user_id,
            caption: content.caption,
            image: content.image,
            created_at: Utc::now(),
        };
        let hydrated = self.hydrate(id, &stored).await;
        table.contents.insert(id, stored);

        Ok(hydrated)
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, ContentError> {
        let table = self.table.read().await;
        match table.contents.get(id) {
            Some(stored) => Ok(Some(self.hydrate(*id, stored).await)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Content>, ContentError> {
        Ok(self.collect(None).await)
    }

    async fn list_page(&self, page: Page) -> Result<Vec<Content>, ContentError> {
        let contents = self.collect(None).await;
        Ok(contents
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Content>, ContentError> {
        Ok(self.collect(Some(user_id)).await)
    }

    async fn update(
        &self,
        id: &ContentId,
        changes: ContentChanges,
    ) -> Result<Content, ContentError> {
        let mut table = self.table.write().await;
        let stored = table
            .contents
            .get_mut(id)
            .ok_or_else(|| ContentError::NotFound(id.to_string()))?;

        if let Some(caption) = changes.caption {
            stored.caption = caption;
        }
        if let Some(image) = changes.image {
            stored.image = image;
        }

        let stored = &*stored;
        Ok(self.hydrate(*id, stored).await)
    }

    async fn delete(&self, id: &ContentId) -> Result<(), ContentError> {
        let mut table = self.table.write().await;
        table
            .contents
            .remove(id)
            .ok_or_else(|| ContentError::NotFound(id.to_string()))?;

        table.likes.retain(|(content_id, _), _| content_id != id);
        table.comments.retain(|c| c.content_id != *id);
        Ok(())
    }

    async fn insert_like(&self, user_id: &UserId, id: &ContentId) -> Result<(), ContentError> {
        let mut table = self.table.write().await;
        if !table.contents.contains_key(id) {
            return Err(ContentError::NotFound(id.to_string()));
        }
        if table.likes.contains_key(&(*id, *user_id)) {
            return Err(ContentError::AlreadyLiked);
        }
        table.likes.insert((*id, *user_id), Utc::now());
        Ok(())
    }

    async fn list_likes(&self, id: &ContentId) -> Result<Vec<Like>, ContentError> {
        let table = self.table.read().await;
        let likers: BTreeSet<(DateTime<Utc>, UserId)> = table
            .likes
            .iter()
            .filter(|((content_id, _), _)| content_id == id)
            .map(|((_, user_id), at)| (*at, *user_id))
            .collect();

        let mut likes = Vec::with_capacity(likers.len());
        for (created_at, user_id) in likers {
            likes.push(Like {
                user_id,
                username: self.username(&user_id).await,
                content_id: *id,
                created_at,
            });
        }
        Ok(likes)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, ContentError> {
        let mut table = self.table.write().await;
        if !table.contents.contains_key(&comment.content_id) {
            return Err(ContentError::NotFound(comment.content_id.to_string()));
        }

        table.next_comment_id += 1;
        let stored = StoredComment {
            id: table.next_comment_id,
            user_id: comment.user_id,
            content_id: comment.content_id,
            text: comment.text,
            created_at: Utc::now(),
        };

        let created = Comment {
            id: stored.id,
            user_id: stored.user_id,
            username: self.username(&stored.user_id).await,
            content_id: stored.content_id,
            text: stored.text.clone(),
            created_at: stored.created_at,
        };
        table.comments.push(stored);

        Ok(created)
    }

    async fn list_comments(&self, id: &ContentId) -> Result<Vec<Comment>, ContentError> {
        let table = self.table.read().await;
        let mut comments = Vec::new();
        for stored in table.comments.iter().filter(|c| c.content_id == *id) {
            comments.push(Comment {
                id: stored.id,
                user_id: stored.user_id,
                username: self.username(&stored.user_id).await,
                content_id: stored.content_id,
                text: stored.text.clone(),
                created_at: stored.created_at,
            });
        }
        Ok(comments)
    }
}
