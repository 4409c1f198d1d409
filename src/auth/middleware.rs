//! Identity propagation middleware
//!
//! Sits in front of every protected route. It removes any client-supplied
//! identity headers, pulls the token from the configured transport, verifies
//! it, and forwards the request with the verified [`Identity`] attached both
//! as a request extension and as `drop-user-*` headers. Requests that fail
//! verification never reach the handler.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_LENGTH},
        HeaderMap, HeaderName, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::models::Identity;
use crate::clips::validators::MAX_CLIP_BYTES;
use crate::common::{safe_token_log, ApiError, AppState, TokenTransport};

pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("drop-user-id");
pub const USER_ISS_HEADER: HeaderName = HeaderName::from_static("drop-user-iss");
pub const USER_EXP_HEADER: HeaderName = HeaderName::from_static("drop-user-exp");

/// Largest body accepted in body transport mode: one clip plus the token line
const MAX_BODY_TRANSPORT_BYTES: usize = MAX_CLIP_BYTES + 16 * 1024;

pub async fn require_identity(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    // Identity headers only ever come from this middleware
    strip_identity_headers(&mut parts.headers);

    let (token, body) = match state.token_transport {
        TokenTransport::Header => (header_token(&parts.headers), body),
        TokenTransport::Body => {
            let bytes = to_bytes(body, MAX_BODY_TRANSPORT_BYTES)
                .await
                .map_err(|_| ApiError::BadRequest("request body too large".to_string()))?;
            let (token, rest) = split_body_token(bytes);
            parts
                .headers
                .insert(CONTENT_LENGTH, HeaderValue::from(rest.len()));
            (token, Body::from(rest))
        }
    };

    let token = match token {
        Some(t) => t,
        None => {
            warn!(uri = %parts.uri, "Authentication failed: missing token");
            return Err(ApiError::Unauthorized("missing auth".to_string()));
        }
    };

    let claims = state.tokens.verify(&token).map_err(|e| {
        warn!(
            error = %e,
            token = %safe_token_log(&token),
            "Token verification failed"
        );
        ApiError::from(e)
    })?;
    let identity = Identity::from(claims);

    insert_identity_headers(&mut parts.headers, &identity)?;
    debug!(user_id = %identity.user_id, issuer = %identity.issuer, "Identity verified");
    parts.extensions.insert(identity);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn strip_identity_headers(headers: &mut HeaderMap) {
    for name in [USER_ID_HEADER, USER_ISS_HEADER, USER_EXP_HEADER] {
        headers.remove(name);
    }
}

fn insert_identity_headers(headers: &mut HeaderMap, identity: &Identity) -> Result<(), ApiError> {
    let invalid = |_| ApiError::Unauthorized("invalid token".to_string());

    headers.insert(
        USER_ID_HEADER,
        HeaderValue::from_str(&identity.user_id).map_err(invalid)?,
    );
    headers.insert(
        USER_ISS_HEADER,
        HeaderValue::from_str(&identity.issuer).map_err(invalid)?,
    );
    headers.insert(USER_EXP_HEADER, HeaderValue::from(identity.expires_at));
    Ok(())
}

/// `Authorization: Bearer <token>` or a raw token in the same header
fn header_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Split a body into its first line (the token) and the rest
fn split_body_token(bytes: Bytes) -> (Option<String>, Bytes) {
    let (line, rest) = match bytes.iter().position(|b| *b == b'\n') {
        Some(idx) => (bytes.slice(..idx), bytes.slice(idx + 1..)),
        None => (bytes, Bytes::new()),
    };

    let token = String::from_utf8_lossy(&line).trim().to_string();
    if token.is_empty() {
        (None, rest)
    } else {
        (Some(token), rest)
    }
}
