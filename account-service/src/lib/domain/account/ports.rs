use async_trait::async_trait;

use crate::account::errors::AccountError;
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
use crate::account::models::Username;

/// Port for account lifecycle operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new, unverified account and send its verification link.
    ///
    /// # Arguments
    /// * `command` - Validated username, email, password and optional profile
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `AlreadyExists` - Email and/or username already taken
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError>;

    /// Mark the account as verified.
    ///
    /// The identity comes from an email-verification token already checked
    /// by the caller. Re-verifying an already verified account succeeds.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn verify_account(&self, id: &UserId) -> Result<User, AccountError>;

    /// Issue and send a fresh verification link.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is malformed
    /// * `EmailNotFound` - No account with this email
    /// * `AlreadyVerified` - Nothing left to verify
    async fn resend_verification(&self, email: &str) -> Result<(), AccountError>;

    /// Authenticate with email and password.
    ///
    /// # Returns
    /// Session token and the authenticated user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `NotVerified` - Correct password, account not verified yet
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AccountError>;

    /// Issue and send a password reset link.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is malformed
    /// * `EmailNotFound` - No account with this email
    async fn forget_password(&self, email: &str) -> Result<(), AccountError>;

    /// Replace the password of the account resolved from a reset token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn reset_password(&self, id: &UserId, password: Password) -> Result<(), AccountError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, AccountError>;

    /// Partially update a profile.
    ///
    /// # Arguments
    /// * `actor` - Identity performing the edit
    /// * `id` - Account being edited
    /// * `command` - Fields to change; absent fields keep their value
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Forbidden` - `actor` does not own the account
    /// * `AlreadyExists` - New username belongs to another user
    /// * `Image` - Image rejected or could not be stored
    async fn edit_profile(
        &self,
        actor: &UserId,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, AccountError>;
}

/// Persistence operations for user accounts.
///
/// Every operation is atomic on a single row.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve user by normalized email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError>;

    /// Retrieve every user holding either the email or the username.
    ///
    /// # Returns
    /// Zero, one, or two users
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email_or_username(
        &self,
        email: &EmailAddress,
        username: &Username,
    ) -> Result<Vec<User>, AccountError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;

    /// Persist a new unverified user.
    ///
    /// # Returns
    /// Stored user with its assigned id
    ///
    /// # Errors
    /// * `AlreadyExists` - Unique constraint on email or username violated
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, user: NewUser) -> Result<User, AccountError>;

    /// Set the verified flag.
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    /// * `DatabaseError` - Database operation failed
    async fn update_verification(&self, id: &UserId, verified: bool) -> Result<(), AccountError>;

    /// Record (or clear) the last issued reset token.
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    /// * `DatabaseError` - Database operation failed
    async fn update_reset_token(
        &self,
        id: &UserId,
        token: Option<String>,
    ) -> Result<(), AccountError>;

    /// Record (or clear) the last issued verification token.
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    /// * `DatabaseError` - Database operation failed
    async fn update_verification_token(
        &self,
        id: &UserId,
        token: Option<String>,
    ) -> Result<(), AccountError>;

    /// Overwrite the stored password hash.
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    /// * `DatabaseError` - Database operation failed
    async fn update_password(&self, id: &UserId, hash: PasswordHash) -> Result<(), AccountError>;

    /// Apply a partial profile update.
    ///
    /// # Returns
    /// Updated user entity
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    /// * `AlreadyExists` - New username violates the unique constraint
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, AccountError>;
}
