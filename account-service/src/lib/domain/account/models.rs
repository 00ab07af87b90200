use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::BioError;
use crate::account::errors::EmailError;
use crate::account::errors::FullnameError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UserIdError;
use crate::account::errors::UsernameError;
use crate::domain::media::ImageUpload;

/// User aggregate entity.
///
/// Identity, credential, and verification state of a registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub fullname: Option<Fullname>,
    pub bio: Option<Bio>,
    pub image: Option<String>,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub reset_password_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// Token subjects carry the id in its decimal form.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(UserId(id)),
            Ok(id) => Err(UserIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(UserIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-30 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 30 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = username.trim().to_string();
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored trimmed
/// and lowercased so uniqueness is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that passed the length policy.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;
    const MAX_LENGTH: usize = 30;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    /// * `TooLong` - More than 30 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    /// Validate a password together with its confirmation field.
    ///
    /// # Errors
    /// * `ConfirmationMismatch` - Confirmation supplied and different
    pub fn with_confirmation(
        password: String,
        confirmation: Option<&str>,
    ) -> Result<Self, PasswordPolicyError> {
        let password = Self::new(password)?;
        match confirmation {
            Some(confirmation) if confirmation != password.0 => {
                Err(PasswordPolicyError::ConfirmationMismatch)
            }
            _ => Ok(password),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Argon2 PHC string as stored in the users table.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(pub String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Display name, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fullname(String);

impl Fullname {
    const MAX_LENGTH: usize = 100;

    pub fn new(fullname: String) -> Result<Self, FullnameError> {
        let length = fullname.chars().count();
        if length > Self::MAX_LENGTH {
            Err(FullnameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(fullname))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short profile blurb, at most 50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bio(String);

impl Bio {
    const MAX_LENGTH: usize = 50;

    pub fn new(bio: String) -> Result<Self, BioError> {
        let length = bio.chars().count();
        if length > Self::MAX_LENGTH {
            Err(BioError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(bio))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Row to insert when registering; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub fullname: Option<Fullname>,
    pub bio: Option<Bio>,
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
    pub fullname: Option<Fullname>,
    pub bio: Option<Bio>,
}

impl RegisterCommand {
    pub fn new(username: Username, email: EmailAddress, password: Password) -> Self {
        Self {
            username,
            email,
            password,
            fullname: None,
            bio: None,
        }
    }

    pub fn with_profile(mut self, fullname: Option<Fullname>, bio: Option<Bio>) -> Self {
        self.fullname = fullname;
        self.bio = bio;
        self
    }
}

/// Credentials presented at login.
///
/// Deliberately unvalidated: a malformed email fails the same way as an
/// unknown one.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Successful login: a session token plus the account it belongs to.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Command to update a profile with optional validated fields.
///
/// Only provided fields are updated.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub username: Option<Username>,
    pub password: Option<Password>,
    pub fullname: Option<Fullname>,
    pub bio: Option<Bio>,
    pub image: Option<ImageUpload>,
}

/// Column changes handed to storage for a partial profile update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub username: Option<Username>,
    pub password_hash: Option<PasswordHash>,
    pub fullname: Option<Fullname>,
    pub bio: Option<Bio>,
    pub image: Option<String>,
}

impl ProfileChanges {
    /// Apply the provided fields onto an existing record.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(fullname) = &self.fullname {
            user.fullname = Some(fullname.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(image) = &self.image {
            user.image = Some(image.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert!(Username::new("ab".to_string()).is_err());
        assert!(Username::new("abc".to_string()).is_ok());
        assert!(Username::new("a".repeat(30)).is_ok());
        assert_eq!(
            Username::new("a".repeat(31)),
            Err(UsernameError::TooLong { max: 30, actual: 31 })
        );
    }

    #[test]
    fn test_username_is_trimmed() {
        let username = Username::new("  alice ".to_string()).unwrap();
        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn test_email_is_validated_and_normalized() {
        let email = EmailAddress::new(" Alice@X.com ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@x.com");
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_password_length_policy() {
        assert_eq!(
            Password::new("12345".to_string()),
            Err(PasswordPolicyError::TooShort { min: 6, actual: 5 })
        );
        assert!(Password::new("123456".to_string()).is_ok());
        assert!(Password::new("x".repeat(31)).is_err());
    }

    #[test]
    fn test_password_confirmation() {
        assert!(Password::with_confirmation("secret1".to_string(), None).is_ok());
        assert!(Password::with_confirmation("secret1".to_string(), Some("secret1")).is_ok());
        assert_eq!(
            Password::with_confirmation("secret1".to_string(), Some("secret2")),
            Err(PasswordPolicyError::ConfirmationMismatch)
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter22".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));

        let hash = PasswordHash("$argon2id$v=19$secret".to_string());
        assert!(!format!("{:?}", hash).contains("argon2id"));

        let login = LoginCommand {
            email: "a@b.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{:?}", login).contains("hunter22"));
    }

    #[test]
    fn test_bio_limit() {
        assert!(Bio::new("x".repeat(50)).is_ok());
        assert!(Bio::new("x".repeat(51)).is_err());
    }

    #[test]
    fn test_fullname_limit() {
        assert!(Fullname::new("x".repeat(100)).is_ok());
        assert_eq!(
            Fullname::new("x".repeat(101)),
            Err(FullnameError::TooLong {
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn test_user_id_from_string() {
        assert_eq!(UserId::from_string("42"), Ok(UserId(42)));
        assert!(UserId::from_string("0").is_err());
        assert!(UserId::from_string("abc").is_err());
    }
}
