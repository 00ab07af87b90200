use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::account::errors::AccountError;
use crate::account::errors::UniqueField;
use crate::domain::account::models::Bio;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Fullname;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::PasswordHash;
use crate::domain::account::models::ProfileChanges;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

const USER_COLUMNS: &str = "id, username, email, password_hash, fullname, bio, image, \
     is_verified, verification_token, reset_password_token, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    fullname: Option<String>,
    bio: Option<String>,
    image: Option<String>,
    is_verified: bool,
    verification_token: Option<String>,
    reset_password_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AccountError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(r.id),
            username: Username::new(r.username)?,
            email: EmailAddress::new(r.email)?,
            password_hash: PasswordHash(r.password_hash),
            fullname: r.fullname.map(Fullname::new).transpose()?,
            bio: r.bio.map(Bio::new).transpose()?,
            image: r.image,
            is_verified: r.is_verified,
            verification_token: r.verification_token,
            reset_password_token: r.reset_password_token,
            created_at: r.created_at,
        })
    }
}

/// Translate a write failure, mapping unique violations to conflicts.
fn map_write_error(e: sqlx::Error) -> AccountError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_username_key") => {
                    return AccountError::AlreadyExists(vec![UniqueField::Username])
                }
                Some("users_email_key") => {
                    return AccountError::AlreadyExists(vec![UniqueField::Email])
                }
                _ => {}
            }
        }
    }
    AccountError::DatabaseError(e.to_string())
}

fn map_read_error(e: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(e.to_string())
}

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, clause: &str, value: &str) -> Result<Option<User>, AccountError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {clause} = $1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?;

        row.map(User::try_from).transpose()
    }

    async fn set_token(
        &self,
        column: &str,
        id: &UserId,
        token: Option<String>,
    ) -> Result<(), AccountError> {
        let result = sqlx::query(&format!("UPDATE users SET {column} = $2 WHERE id = $1"))
            .bind(id.0)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        self.find_one("email", email).await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError> {
        self.find_one("username", username.as_str()).await
    }

    async fn find_by_email_or_username(
        &self,
        email: &EmailAddress,
        username: &Username,
    ) -> Result<Vec<User>, AccountError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR username = $2"
        ))
        .bind(email.as_str())
        .bind(username.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?;

        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<User, AccountError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, fullname, bio, is_verified)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.fullname.as_ref().map(Fullname::as_str))
        .bind(user.bio.as_ref().map(|b| b.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        User::try_from(row)
    }

    async fn update_verification(&self, id: &UserId, verified: bool) -> Result<(), AccountError> {
        let result = sqlx::query("UPDATE users SET is_verified = $2 WHERE id = $1")
            .bind(id.0)
            .bind(verified)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn update_reset_token(
        &self,
        id: &UserId,
        token: Option<String>,
    ) -> Result<(), AccountError> {
        self.set_token("reset_password_token", id, token).await
    }

    async fn update_verification_token(
        &self,
        id: &UserId,
        token: Option<String>,
    ) -> Result<(), AccountError> {
        self.set_token("verification_token", id, token).await
    }

    async fn update_password(&self, id: &UserId, hash: PasswordHash) -> Result<(), AccountError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id.0)
            .bind(hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, AccountError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                fullname = COALESCE($4, fullname),
                bio = COALESCE($5, bio),
                image = COALESCE($6, image)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(changes.username.as_ref().map(|u| u.as_str()))
        .bind(changes.password_hash.as_ref().map(|h| h.as_str()))
        .bind(changes.fullname.as_ref().map(Fullname::as_str))
        .bind(changes.bio.as_ref().map(|b| b.as_str()))
        .bind(changes.image.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(User::try_from)
            .transpose()?
            .ok_or(AccountError::NotFound(id.to_string()))
    }
}
