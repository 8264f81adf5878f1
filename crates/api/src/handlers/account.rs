//! Handlers for the signed-in user's own account.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_db::models::user::{UpdateUser, User};
use taskboard_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `PATCH /account/profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 30, message = "Name must be between 2 and 30 characters"))]
    pub name: String,
    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}

/// Request body for `PUT /account/password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "Minimum 6 characters required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,
}

/// PATCH /api/v1/account/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    let update = UpdateUser {
        name: Some(input.name.trim().to_string()),
        image: input.image,
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/account/password
///
/// A wrong current password is a 401. Accounts created through Google have
/// no password to confirm and are rejected the same way.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let Some(stored_hash) = auth.user.password_hash.as_deref() else {
        return Err(CoreError::Unauthenticated.into());
    };

    let valid = verify_password(&input.current_password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::warn!(user_id = %auth.user_id, "Password change with wrong current password");
        return Err(CoreError::Unauthenticated.into());
    }

    let new_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password_hash(&state.pool, auth.user_id, &new_hash).await?;

    tracing::info!(user_id = %auth.user_id, "Password changed");
    Ok(Json(MessageResponse::ok("Password updated")))
}
