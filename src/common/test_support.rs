//! Fixtures shared by the test modules

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

use super::{migrations, AppState, TokenTransport};
use crate::auth::tokens::TokenService;
use crate::router::build_router;
use crate::services::CredentialService;
use crate::storage::Stores;

pub const TEST_JWT_SECRET: &str = "clipboard-jwt-secret";
pub const TEST_ENCRYPTION_KEY: &str = "my-secret-foobarbaz200030004000x";

/// Single-connection in-memory SQLite pool
///
/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is pinned to one connection that never idles out.
pub async fn sqlite_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

pub async fn sqlite_stores() -> Stores {
    let pool = sqlite_pool().await;
    migrations::run_migrations(&pool, false).await.unwrap();
    Stores::sqlite(pool)
}

pub fn token_service(secret: &str) -> Arc<TokenService> {
    Arc::new(TokenService::new(secret, Duration::hours(24)).unwrap())
}

pub fn credential_service() -> Arc<CredentialService> {
    Arc::new(CredentialService::from_key(TEST_ENCRYPTION_KEY).unwrap())
}

pub fn app_state(stores: Stores, transport: TokenTransport) -> Arc<AppState> {
    Arc::new(AppState {
        accounts: stores.accounts,
        clips: stores.clips,
        tokens: token_service(TEST_JWT_SECRET),
        credentials: credential_service(),
        token_transport: transport,
    })
}

pub fn memory_state() -> Arc<AppState> {
    app_state(Stores::memory(), TokenTransport::Header)
}

/// Full router over in-memory stores with header token transport
pub fn memory_app() -> Router {
    build_router(memory_state())
}

// ============================================================================
// Router helpers
// ============================================================================

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn text_request(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/plain");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Send one request; the body comes back as JSON, or `Value::Null` when empty
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        (status, Value::Null)
    } else {
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

/// Register and log in; returns `(account id, token)`
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> (String, String) {
    let credentials = json!({ "username": username, "password": password });

    let (status, body) = send(
        app,
        json_request(Method::POST, "/register", None, credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(app, json_request(Method::POST, "/login", None, credentials)).await;
    assert_eq!(status, StatusCode::OK, "login {username}: {body}");
    let token = body["token"].as_str().unwrap().to_string();

    (id, token)
}
