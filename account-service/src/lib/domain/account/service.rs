use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenPurpose;
use auth::TokenService;

use crate::account::errors::AccountError;
use crate::account::errors::UniqueField;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::LoginOutcome;
use crate::account::models::NewUser;
use crate::account::models::Password;
use crate::account::models::PasswordHash;
use crate::account::models::ProfileChanges;
use crate::account::models::RegisterCommand;
use crate::account::models::UpdateProfileCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::notifications::password_reset_email;
use crate::account::notifications::verification_email;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::domain::authorization::ensure_owner;
use crate::domain::authorization::Owned;
use crate::domain::media::ImageStore;
use crate::domain::notification::Notification;
use crate::domain::notification::NotificationSink;

impl Owned for User {
    fn owner_id(&self) -> UserId {
        self.id
    }
}

/// Domain service implementation for the account lifecycle.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR, NS, IS>
where
    AR: AccountRepository,
    NS: NotificationSink + ?Sized,
    IS: ImageStore,
{
    repository: Arc<AR>,
    notifier: Arc<NS>,
    images: Arc<IS>,
    tokens: Arc<TokenService>,
    password_hasher: PasswordHasher,
    public_url: String,
}

impl<AR, NS, IS> AccountService<AR, NS, IS>
where
    AR: AccountRepository,
    NS: NotificationSink + ?Sized,
    IS: ImageStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `notifier` - Email delivery implementation
    /// * `images` - Avatar storage implementation
    /// * `tokens` - Token issuer shared with the HTTP gate
    /// * `password_hasher` - Configured Argon2 hasher
    /// * `public_url` - Base URL embedded in emailed links
    pub fn new(
        repository: Arc<AR>,
        notifier: Arc<NS>,
        images: Arc<IS>,
        tokens: Arc<TokenService>,
        password_hasher: PasswordHasher,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            notifier,
            images,
            tokens,
            password_hasher,
            public_url: public_url.into(),
        }
    }

    async fn hash_password(&self, password: &Password) -> Result<PasswordHash, AccountError> {
        let hasher = self.password_hasher.clone();
        let plaintext = password.expose().to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
            .map(PasswordHash)
            .map_err(AccountError::from)
    }

    async fn verify_password(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, AccountError> {
        let hasher = self.password_hasher.clone();
        let plaintext = plaintext.to_string();
        let hash = hash.as_str().to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    async fn load(&self, id: &UserId) -> Result<User, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn load_by_email(&self, email: &str) -> Result<User, AccountError> {
        let email = EmailAddress::new(email.to_string())?;
        self.repository
            .find_by_email(email.as_str())
            .await?
            .ok_or_else(|| AccountError::EmailNotFound(email.to_string()))
    }

    /// Issue a verification token, record it, and email the link.
    async fn dispatch_verification(&self, user: &User) -> Result<String, AccountError> {
        let purpose = TokenPurpose::EmailVerification;
        let issued = self.tokens.issue(user.id, purpose)?;

        self.repository
            .update_verification_token(&user.id, Some(issued.token.clone()))
            .await?;

        let mail = verification_email(
            &user.email,
            &self.public_url,
            &issued.token,
            self.tokens.ttl_for(purpose).num_minutes(),
        );
        self.notify(user, &mail).await;

        Ok(issued.token)
    }

    async fn notify(&self, user: &User, notification: &Notification) {
        match self.notifier.send(notification).await {
            Ok(()) => tracing::debug!(
                user_id = %user.id,
                subject = %notification.subject,
                "Notification sent"
            ),
            Err(e) => tracing::error!(
                "Failed to send '{}' to user {}: {}",
                notification.subject,
                user.id,
                e
            ),
        }
    }
}

#[async_trait]
impl<AR, NS, IS> AccountServicePort for AccountService<AR, NS, IS>
where
    AR: AccountRepository,
    NS: NotificationSink + ?Sized,
    IS: ImageStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError> {
        // Fast path only; the unique constraints on insert have the final say.
        let existing = self
            .repository
            .find_by_email_or_username(&command.email, &command.username)
            .await?;
        if !existing.is_empty() {
            let mut fields = Vec::new();
            if existing.iter().any(|u| u.email == command.email) {
                fields.push(UniqueField::Email);
            }
            if existing.iter().any(|u| u.username == command.username) {
                fields.push(UniqueField::Username);
            }
            return Err(AccountError::AlreadyExists(fields));
        }

        let password_hash = self.hash_password(&command.password).await?;

        let mut user = self
            .repository
            .insert(NewUser {
                username: command.username,
                email: command.email,
                password_hash,
                fullname: command.fullname,
                bio: command.bio,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Account registered");

        // The account exists from here on; a failed dispatch is recovered
        // through resend-verification.
        match self.dispatch_verification(&user).await {
            Ok(token) => user.verification_token = Some(token),
            Err(e) => tracing::error!(
                "Failed to dispatch verification for user {}: {}",
                user.id,
                e
            ),
        }

        Ok(user)
    }

    async fn verify_account(&self, id: &UserId) -> Result<User, AccountError> {
        self.repository.update_verification(id, true).await?;
        self.repository.update_verification_token(id, None).await?;

        tracing::info!(user_id = %id, "Account verified");

        self.load(id).await
    }

    async fn resend_verification(&self, email: &str) -> Result<(), AccountError> {
        let user = self.load_by_email(email).await?;
        if user.is_verified {
            return Err(AccountError::AlreadyVerified);
        }

        self.dispatch_verification(&user).await?;
        Ok(())
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AccountError> {
        let email = command.email.trim().to_lowercase();
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self
            .verify_password(&command.password, &user.password_hash)
            .await?
        {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(AccountError::NotVerified);
        }

        let issued = self.tokens.issue(user.id, TokenPurpose::Session)?;

        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn forget_password(&self, email: &str) -> Result<(), AccountError> {
        let user = self.load_by_email(email).await?;

        let purpose = TokenPurpose::PasswordReset;
        let issued = self.tokens.issue(user.id, purpose)?;
        self.repository
            .update_reset_token(&user.id, Some(issued.token.clone()))
            .await?;

        let mail = password_reset_email(
            &user.email,
            &self.public_url,
            &issued.token,
            self.tokens.ttl_for(purpose).num_minutes(),
        );
        self.notify(&user, &mail).await;

        Ok(())
    }

    async fn reset_password(&self, id: &UserId, password: Password) -> Result<(), AccountError> {
        let user = self.load(id).await?;

        let password_hash = self.hash_password(&password).await?;
        self.repository
            .update_password(&user.id, password_hash)
            .await?;
        self.repository.update_reset_token(&user.id, None).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, AccountError> {
        self.load(id).await
    }

    async fn edit_profile(
        &self,
        actor: &UserId,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, AccountError> {
        let user = self.load(id).await?;
        ensure_owner(*actor, &user)?;

        let mut changes = ProfileChanges {
            fullname: command.fullname,
            bio: command.bio,
            ..ProfileChanges::default()
        };

        if let Some(username) = command.username {
            if username != user.username {
                let holder = self.repository.find_by_username(&username).await?;
                if holder.is_some_and(|other| other.id != user.id) {
                    return Err(AccountError::AlreadyExists(vec![UniqueField::Username]));
                }
                changes.username = Some(username);
            }
        }

        if let Some(password) = &command.password {
            changes.password_hash = Some(self.hash_password(password).await?);
        }

        if let Some(image) = command.image {
            image.validate()?;
            changes.image = Some(self.images.store(image).await?);
        }

        self.repository.update_profile(&user.id, changes).await
    }
}
