//! Authentication handlers

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
};
use chrono::SecondsFormat;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::extractors::AuthedUser;
use super::models::{CredentialsRequest, LoginResponse, RegisterResponse, WhoamiResponse};
use super::tokens::LOGIN_ISSUER;
use crate::common::{ApiError, AppState, Validator};
use crate::storage::StoreError;

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("invalid credentials".to_string())
}

/// POST /register
/// Creates an account with a protected credential
///
/// # Request Body
/// ```json
/// { "username": "alice", "password": "hunter2" }
/// ```
///
/// # Response (201)
/// ```json
/// { "id": "<uuid>", "username": "alice" }
/// ```
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    payload.validate().into_result()?;

    let credential = state.credentials.protect(&payload.password)?;
    let account = state
        .accounts
        .register(&payload.username, &credential)
        .await
        .map_err(|e| {
            if matches!(e, StoreError::Conflict(_)) {
                warn!(username = %payload.username, "Registration rejected: username taken");
            }
            ApiError::from(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: account.id,
            username: account.username,
        }),
    ))
}

/// POST /login
/// Exchanges a username and password for a signed login token
///
/// Unknown usernames and wrong passwords produce the same 401.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let stored = match state
        .accounts
        .find_credential_by_username(&payload.username)
        .await
    {
        Ok(credential) => credential,
        Err(StoreError::NotFound) => {
            warn!(username = %payload.username, "Login failed: unknown username");
            return Err(invalid_credentials());
        }
        Err(e) => return Err(e.into()),
    };

    if !state.credentials.matches(&payload.password, &stored)? {
        warn!(username = %payload.username, "Login failed: wrong password");
        return Err(invalid_credentials());
    }

    // The username can change hands between the lookups above and below, so
    // the token subject must be the account holding the credential that matched
    let user_id = match state.accounts.find_id_by_username(&payload.username).await {
        Ok(id) => id,
        Err(StoreError::NotFound) => return Err(invalid_credentials()),
        Err(e) => return Err(e.into()),
    };
    let account = match state.accounts.get_account(&user_id).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => return Err(invalid_credentials()),
        Err(e) => return Err(e.into()),
    };
    if account.credential != stored {
        warn!(
            user_id = %user_id,
            username = %payload.username,
            "Login failed: username changed accounts during login"
        );
        return Err(invalid_credentials());
    }

    let (token, expires_at) = state.tokens.issue(LOGIN_ISSUER, &user_id)?;
    info!(user_id = %user_id, username = %payload.username, "Login successful");

    Ok(Json(LoginResponse {
        token,
        expires_at: expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        username: payload.username,
    }))
}

/// GET /whoami
pub async fn whoami(user: AuthedUser) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        user_id: user.id,
        issuer: user.issuer,
    })
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
