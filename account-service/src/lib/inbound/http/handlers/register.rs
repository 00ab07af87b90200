use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::domain::account::models::Bio;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Fullname;
use crate::domain::account::models::Password;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::Username;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisteredUserData>, ApiError> {
    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "Account created. Check your email to verify your account",
                user.into(),
            )
        })
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    confirm_password: Option<String>,
    fullname: Option<String>,
    bio: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, AccountError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::with_confirmation(self.password, self.confirm_password.as_deref())?;
        let fullname = self.fullname.map(Fullname::new).transpose()?;
        let bio = self.bio.map(Bio::new).transpose()?;

        Ok(RegisterCommand::new(username, email, password).with_profile(fullname, bio))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
}

impl From<&User> for RegisteredUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.to_string(),
            email: user.email.to_string(),
            is_verified: user.is_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::errors::PasswordPolicyError;

    fn request(password: &str, confirm: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.map(str::to_string),
            fullname: None,
            bio: None,
        }
    }

    #[test]
    fn test_confirmation_is_optional() {
        assert!(request("secret1", None).try_into_command().is_ok());
    }

    #[test]
    fn test_fullname_is_bounded() {
        let mut at_limit = request("secret1", None);
        at_limit.fullname = Some("x".repeat(100));
        assert!(at_limit.try_into_command().is_ok());

        let mut too_long = request("secret1", None);
        too_long.fullname = Some("x".repeat(101));
        assert!(matches!(
            too_long.try_into_command(),
            Err(AccountError::InvalidFullname(_))
        ));
    }

    #[test]
    fn test_confirmation_must_match() {
        let result = request("secret1", Some("secret2")).try_into_command();
        assert!(matches!(
            result,
            Err(AccountError::InvalidPassword(
                PasswordPolicyError::ConfirmationMismatch
            ))
        ));
    }
}
