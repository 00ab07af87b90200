use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenPurpose;

/// Lifetime of each token purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtls {
    pub session: Duration,
    pub email_verification: Duration,
    pub password_reset: Duration,
}

impl Default for TokenTtls {
    fn default() -> Self {
        Self {
            session: Duration::hours(1),
            email_verification: Duration::minutes(10),
            password_reset: Duration::minutes(30),
        }
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies purpose-tagged, expiring bearer tokens.
///
/// Validity is stateless: a token verifies while its signature matches the
/// current secret and the clock is before its expiry. There is no
/// revocation; constructing a service with a new secret invalidates every
/// outstanding token.
pub struct TokenService {
    jwt_handler: JwtHandler,
    ttls: TokenTtls,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - Secret key for JWT signing
    /// * `ttls` - Lifetime per token purpose
    pub fn new(secret: &[u8], ttls: TokenTtls) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            ttls,
        }
    }

    /// Configured lifetime for a purpose.
    pub fn ttl_for(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::Session => self.ttls.session,
            TokenPurpose::EmailVerification => self.ttls.email_verification,
            TokenPurpose::PasswordReset => self.ttls.password_reset,
        }
    }

    /// Issue a token for `subject` using the purpose's configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue(
        &self,
        subject: impl ToString,
        purpose: TokenPurpose,
    ) -> Result<IssuedToken, JwtError> {
        self.issue_at(subject, purpose, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: impl ToString,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        self.issue_with_ttl(subject, purpose, self.ttl_for(purpose), now)
    }

    /// Issue a token with an explicit lifetime.
    pub fn issue_with_ttl(
        &self,
        subject: impl ToString,
        purpose: TokenPurpose,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(subject, purpose, now, ttl);
        let token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at().unwrap_or(now + ttl),
        })
    }

    /// Verify a token for the expected purpose and return its subject.
    ///
    /// # Errors
    /// * `Malformed` - Not a decodable token
    /// * `SignatureMismatch` - Signed with a different secret or tampered
    /// * `Expired` - Past its expiry
    /// * `PurposeMismatch` - Issued for a different purpose
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<String, JwtError> {
        self.verify_at(token, purpose, Utc::now())
            .map(|claims| claims.sub)
    }

    /// Verify a token against an explicit clock and return its claims.
    pub fn verify_at(
        &self,
        token: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::Expired);
        }

        if claims.purpose != purpose {
            return Err(JwtError::PurposeMismatch {
                expected: purpose,
                actual: claims.purpose,
            });
        }

        Ok(claims)
    }
}
