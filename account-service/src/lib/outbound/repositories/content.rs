use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::content::errors::ContentError;
use crate::domain::account::models::UserId;
use crate::domain::content::models::Caption;
use crate::domain::content::models::Comment;
use crate::domain::content::models::CommentText;
use crate::domain::content::models::Content;
use crate::domain::content::models::ContentChanges;
use crate::domain::content::models::ContentId;
use crate::domain::content::models::Like;
use crate::domain::content::models::NewComment;
use crate::domain::content::models::NewContent;
use crate::domain::content::models::Page;
use crate::domain::content::ports::ContentRepository;

const CONTENT_SELECT: &str = "SELECT c.id, c.user_id, u.username, c.caption, c.image, c.created_at \
     FROM contents c JOIN users u ON u.id = c.user_id";

#[derive(Debug, FromRow)]
struct ContentRow {
    id: i64,
    user_id: i64,
    username: String,
    caption: String,
    image: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for Content {
    type Error = ContentError;

    fn try_from(r: ContentRow) -> Result<Self, Self::Error> {
        Ok(Content {
            id: ContentId(r.id),
            user_id: UserId(r.user_id),
            username: r.username,
            caption: Caption::new(r.caption)?,
            image: r.image,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct LikeRow {
    user_id: i64,
    username: String,
    content_id: i64,
    created_at: DateTime<Utc>,
}

impl From<LikeRow> for Like {
    fn from(r: LikeRow) -> Self {
        Like {
            user_id: UserId(r.user_id),
            username: r.username,
            content_id: ContentId(r.content_id),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    user_id: i64,
    username: String,
    content_id: i64,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = ContentError;

    fn try_from(r: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: r.id,
            user_id: UserId(r.user_id),
            username: r.username,
            content_id: ContentId(r.content_id),
            text: CommentText::new(r.comment)?,
            created_at: r.created_at,
        })
    }
}

fn db_error(e: sqlx::Error) -> ContentError {
    ContentError::DatabaseError(e.to_string())
}

pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn insert(&self, content: NewContent) -> Result<Content, ContentError> {
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO contents (user_id, caption, image)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, caption, image, created_at
            )
            SELECT i.id, i.user_id, u.username, i.caption, i.image, i.created_at
            FROM inserted i JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(content.user_id.0)
        .bind(content.caption.as_str())
        .bind(&content.image)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Content::try_from(row)
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, ContentError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!("{CONTENT_SELECT} WHERE c.id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(Content::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Content>, ContentError> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "{CONTENT_SELECT} ORDER BY c.created_at DESC, c.id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Content::try_from).collect()
    }

    async fn list_page(&self, page: Page) -> Result<Vec<Content>, ContentError> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "{CONTENT_SELECT} ORDER BY c.created_at DESC, c.id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Content::try_from).collect()
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Content>, ContentError> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "{CONTENT_SELECT} WHERE c.user_id = $1 ORDER BY c.created_at DESC, c.id DESC"
        ))
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Content::try_from).collect()
    }

    async fn update(
        &self,
        id: &ContentId,
        changes: ContentChanges,
    ) -> Result<Content, ContentError> {
        let result = sqlx::query(
            r#"
            UPDATE contents
            SET caption = COALESCE($2, caption),
                image = COALESCE($3, image)
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(changes.caption.as_ref().map(|c| c.as_str()))
        .bind(changes.image.as_deref())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound(id.to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &ContentId) -> Result<(), ContentError> {
        // Likes and comments go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn insert_like(&self, user_id: &UserId, id: &ContentId) -> Result<(), ContentError> {
        sqlx::query("INSERT INTO content_likes (user_id, content_id) VALUES ($1, $2)")
            .bind(user_id.0)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return ContentError::AlreadyLiked;
                    }
                    if db_err.is_foreign_key_violation() {
                        return ContentError::NotFound(id.to_string());
                    }
                }
                db_error(e)
            })?;

        Ok(())
    }

    async fn list_likes(&self, id: &ContentId) -> Result<Vec<Like>, ContentError> {
        let rows = sqlx::query_as::<_, LikeRow>(
            r#"
            SELECT l.user_id, u.username, l.content_id, l.created_at
            FROM content_likes l JOIN users u ON u.id = l.user_id
            WHERE l.content_id = $1
            ORDER BY l.created_at ASC
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Like::from).collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, ContentError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (user_id, content_id, comment)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, content_id, comment, created_at
            )
            SELECT i.id, i.user_id, u.username, i.content_id, i.comment, i.created_at
            FROM inserted i JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(comment.user_id.0)
        .bind(comment.content_id.0)
        .bind(comment.text.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_foreign_key_violation() => {
                ContentError::NotFound(comment.content_id.to_string())
            }
            _ => db_error(e),
        })?;

        Comment::try_from(row)
    }

    async fn list_comments(&self, id: &ContentId) -> Result<Vec<Comment>, ContentError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT m.id, m.user_id, u.username, m.content_id, m.comment, m.created_at
            FROM comments m JOIN users u ON u.id = m.user_id
            WHERE m.content_id = $1
            ORDER BY m.created_at ASC, m.id ASC
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Comment::try_from).collect()
    }
}
