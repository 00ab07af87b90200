use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::get_user::ProfileData;
use super::multipart::FormData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::domain::account::models::Bio;
use crate::domain::account::models::Fullname;
use crate::domain::account::models::Password;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::account::models::Username;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Partial profile update from `multipart/form-data`.
///
/// Text fields `username`, `password`, `fullname`, `bio`; file field `image`.
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    let form = FormData::read(multipart, "image").await?;
    let command = parse_command(form)?;

    state
        .account_service
        .edit_profile(&identity.user_id, &identity.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "Profile updated", user.into()))
}

fn parse_command(mut form: FormData) -> Result<UpdateProfileCommand, AccountError> {
    Ok(UpdateProfileCommand {
        username: form.text("username").map(Username::new).transpose()?,
        password: form.text("password").map(Password::new).transpose()?,
        fullname: form.text("fullname").map(Fullname::new).transpose()?,
        bio: form.text("bio").map(Bio::new).transpose()?,
        image: form.image.take(),
    })
}
