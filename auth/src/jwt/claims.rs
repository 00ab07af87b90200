use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// What a token may be used for.
///
/// The purpose is part of the signed payload, so a verification token can
/// never be replayed as a session or reset token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Session => "session",
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT payload issued by [`crate::TokenService`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Token purpose
    pub purpose: TokenPurpose,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Create claims for a subject, valid for `ttl` starting at `issued_at`.
    pub fn new(
        subject: impl ToString,
        purpose: TokenPurpose,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            sub: subject.to_string(),
            purpose,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Expiration as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is live strictly before its expiration second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let now = Utc::now();
        let claims = Claims::new(42, TokenPurpose::Session, now, Duration::hours(1));

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.purpose, TokenPurpose::Session);
        assert_eq!(claims.exp - claims.iat, 60 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_each_token_gets_its_own_id() {
        let now = Utc::now();
        let a = Claims::new(1, TokenPurpose::Session, now, Duration::minutes(1));
        let b = Claims::new(1, TokenPurpose::Session, now, Duration::minutes(1));
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_is_expired() {
        let issued = DateTime::from_timestamp(1000, 0).unwrap();
        let claims = Claims::new(1, TokenPurpose::Session, issued, Duration::seconds(10));

        assert!(!claims.is_expired(1009));
        assert!(claims.is_expired(1010));
        assert!(claims.is_expired(1011));
    }

    #[test]
    fn test_purpose_serializes_snake_case() {
        let json = serde_json::to_string(&TokenPurpose::EmailVerification).unwrap();
        assert_eq!(json, "\"email_verification\"");
        assert_eq!(TokenPurpose::PasswordReset.to_string(), "password_reset");
    }
}
