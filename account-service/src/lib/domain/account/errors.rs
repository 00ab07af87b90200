use std::fmt;

use thiserror::Error;

use crate::domain::authorization::OwnershipError;
use crate::domain::media::ImageStoreError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Password confirmation does not match")]
    ConfirmationMismatch,
}

/// Error for full name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FullnameError {
    #[error("Full name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Bio validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BioError {
    #[error("Bio too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// A column whose value must be unique across users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Email,
    Username,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Username => "username",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn describe_conflict(fields: &[UniqueField]) -> String {
    match fields {
        [UniqueField::Email] => "Email already exists".to_string(),
        [UniqueField::Username] => "Username already exists".to_string(),
        _ => "Email and username already exist".to_string(),
    }
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Input validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid full name: {0}")]
    InvalidFullname(#[from] FullnameError),

    #[error("Invalid bio: {0}")]
    InvalidBio(#[from] BioError),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageStoreError),

    // Domain-level errors
    #[error("{}", describe_conflict(.0))]
    AlreadyExists(Vec<UniqueField>),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("No account registered with email {0}")]
    EmailNotFound(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account not verified")]
    NotVerified,

    #[error("Account already verified")]
    AlreadyVerified,

    #[error("Forbidden: {0}")]
    Forbidden(#[from] OwnershipError),

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::PasswordError> for AccountError {
    fn from(err: auth::PasswordError) -> Self {
        AccountError::Hashing(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_fields() {
        assert_eq!(
            AccountError::AlreadyExists(vec![UniqueField::Email]).to_string(),
            "Email already exists"
        );
        assert_eq!(
            AccountError::AlreadyExists(vec![UniqueField::Username]).to_string(),
            "Username already exists"
        );
        assert_eq!(
            AccountError::AlreadyExists(vec![UniqueField::Email, UniqueField::Username])
                .to_string(),
            "Email and username already exist"
        );
    }
}
