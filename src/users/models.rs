//! Account data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registered account
///
/// `credential` is the at-rest (encrypted) form of the password and is never
/// serialized into responses.
#[derive(FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub credential: String,
    pub created_at: String,
}

/// Body of `PATCH /users/me/username`
#[derive(Deserialize, Debug)]
pub struct RenameRequest {
    pub username: String,
}

/// Body of `PATCH /users/me/password`
#[derive(Deserialize, Debug)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
