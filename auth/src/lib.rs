//! Credential primitives for the account service.
//!
//! Provides:
//! - Password hashing (Argon2id, configurable cost)
//! - JWT encoding and decoding
//! - Purpose-tagged, expiring bearer tokens
//!
//! The service defines its own domain traits and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenPurpose, TokenService, TokenTtls};
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", TokenTtls::default());
//!
//! let issued = tokens.issue(42, TokenPurpose::EmailVerification).unwrap();
//! let subject = tokens.verify(&issued.token, TokenPurpose::EmailVerification).unwrap();
//! assert_eq!(subject, "42");
//!
//! // A verification token is not a session token.
//! assert!(tokens.verify(&issued.token, TokenPurpose::Session).is_err());
//! ```

pub mod jwt;
pub mod password;
pub mod token_service;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenPurpose;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token_service::IssuedToken;
pub use token_service::TokenService;
pub use token_service::TokenTtls;
