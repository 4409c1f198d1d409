//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::models::Identity;
use crate::common::ApiError;

/// Authenticated caller
///
/// Read from the [`Identity`] that `require_identity` attached to the
/// request. Handlers take the account id from here and nowhere else.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub issuer: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(identity) => Ok(AuthedUser {
                id: identity.user_id.clone(),
                issuer: identity.issuer.clone(),
            }),
            None => {
                warn!(uri = %parts.uri, "Authentication failed: no verified identity on request");
                Err(ApiError::Unauthorized("missing auth".into()))
            }
        }
    }
}
