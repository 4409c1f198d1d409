//! Account handlers
//!
//! All of these act on the caller's own account, identified by the verified
//! token subject.

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

use super::models::{Account, ChangePasswordRequest, MessageResponse, RenameRequest};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, Validator};

/// GET /users/me
pub async fn get_me(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<Account>, ApiError> {
    let account = state.accounts.get_account(&user.id).await?;
    Ok(Json(account))
}

/// PATCH /users/me/username
///
/// # Request Body
/// ```json
/// { "username": "alicia" }
/// ```
///
/// Returns the updated account, or 409 if the name belongs to another account.
pub async fn rename_me(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Json(payload): Json<RenameRequest>,
) -> Result<Json<Account>, ApiError> {
    payload.validate().into_result()?;

    state
        .accounts
        .rename_username(&user.id, &payload.username)
        .await?;

    let account = state.accounts.get_account(&user.id).await?;
    Ok(Json(account))
}

/// PATCH /users/me/password
pub async fn change_password(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.validate().into_result()?;

    let account = state.accounts.get_account(&user.id).await?;
    if !state
        .credentials
        .matches(&payload.current_password, &account.credential)?
    {
        warn!(user_id = %user.id, "Password change rejected: wrong current password");
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    let credential = state.credentials.protect(&payload.new_password)?;
    state
        .accounts
        .update_credential(&user.id, &credential)
        .await?;

    info!(user_id = %user.id, "Password changed");
    Ok(Json(MessageResponse {
        message: "password updated".to_string(),
    }))
}

/// DELETE /users/me
/// Removes the account and every clip it owns
pub async fn delete_me(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.accounts.delete_account(&user.id).await?;

    Ok(Json(MessageResponse {
        message: "account deleted".to_string(),
    }))
}
