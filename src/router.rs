// src/router.rs
//! Router composition
//!
//! Public routes are merged as-is. Protected routes are grouped first and
//! wrapped with `require_identity` through `route_layer`, so the middleware
//! runs only for requests that matched one of them.

use axum::{extract::Extension, middleware, Router};
use std::sync::Arc;

use crate::auth::{self, require_identity};
use crate::common::AppState;
use crate::{clips, logging_middleware, users};

pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(auth::protected_routes())
        .merge(clips::clips_routes())
        .merge(users::users_routes())
        .route_layer(middleware::from_fn(require_identity));

    Router::new()
        .merge(auth::public_routes())
        .merge(protected)
        .layer(middleware::from_fn(logging_middleware::log_requests))
        .layer(Extension(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::common::test_support::{
        app_state, json_request, register_and_login, send, sqlite_stores, text_request,
    };
    use crate::common::TokenTransport;
    use crate::storage::Stores;

    async fn apps() -> Vec<(&'static str, Router)> {
        vec![
            (
                "memory",
                build_router(app_state(Stores::memory(), TokenTransport::Header)),
            ),
            (
                "sqlite",
                build_router(app_state(sqlite_stores().await, TokenTransport::Header)),
            ),
        ]
    }

    #[tokio::test]
    async fn test_clip_lifecycle_across_two_accounts() {
        for (name, app) in apps().await {
            let (alice_id, alice) = register_and_login(&app, "alice", "hunter2").await;
            let (_, bob) = register_and_login(&app, "bob", "hunter3").await;

            let (status, clip) =
                send(&app, text_request(Method::POST, "/clipboards", Some(&alice), "hello")).await;
            assert_eq!(status, StatusCode::CREATED, "{name}");
            assert_eq!(clip["owner_id"], alice_id.as_str(), "{name}");
            let uri = format!("/clipboards/{}", clip["id"].as_str().unwrap());

            let (status, _) = send(&app, text_request(Method::GET, &uri, Some(&bob), "")).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{name}");

            let (status, body) =
                send(&app, text_request(Method::GET, &uri, Some(&alice), "")).await;
            assert_eq!(status, StatusCode::OK, "{name}");
            assert_eq!(body["text"], "hello", "{name}");

            let (status, _) =
                send(&app, text_request(Method::PATCH, &uri, Some(&alice), "world")).await;
            assert_eq!(status, StatusCode::OK, "{name}");

            let (_, body) = send(&app, text_request(Method::GET, &uri, Some(&alice), "")).await;
            assert_eq!(body["text"], "world", "{name}");

            let (status, _) =
                send(&app, text_request(Method::DELETE, &uri, Some(&alice), "")).await;
            assert_eq!(status, StatusCode::NO_CONTENT, "{name}");

            let (status, _) = send(&app, text_request(Method::GET, &uri, Some(&alice), "")).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{name}");
        }
    }

    #[tokio::test]
    async fn test_rename_to_taken_username_keeps_account_and_clips() {
        for (name, app) in apps().await {
            let (_, alice) = register_and_login(&app, "alice", "hunter2").await;
            register_and_login(&app, "bob", "hunter3").await;
            send(&app, text_request(Method::POST, "/clipboards", Some(&alice), "mine")).await;

            let (status, body) = send(
                &app,
                json_request(
                    Method::PATCH,
                    "/users/me/username",
                    Some(&alice),
                    json!({ "username": "bob" }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CONFLICT, "{name}");
            assert_eq!(body["error"], "username already taken", "{name}");

            let (_, me) =
                send(&app, json_request(Method::GET, "/users/me", Some(&alice), json!({}))).await;
            assert_eq!(me["username"], "alice", "{name}");

            let (_, clips) =
                send(&app, json_request(Method::GET, "/clipboards", Some(&alice), json!({}))).await;
            assert_eq!(clips["count"], 1, "{name}");
            assert_eq!(clips["clips"][0]["text"], "mine", "{name}");
        }
    }

    #[tokio::test]
    async fn test_deleting_account_removes_its_clips() {
        for (name, app) in apps().await {
            let (_, alice) = register_and_login(&app, "alice", "hunter2").await;
            send(&app, text_request(Method::POST, "/clipboards", Some(&alice), "one")).await;

            let (status, _) =
                send(&app, json_request(Method::DELETE, "/users/me", Some(&alice), json!({}))).await;
            assert_eq!(status, StatusCode::OK, "{name}");

            // Same name, new account, no inherited clips
            let (_, again) = register_and_login(&app, "alice", "hunter2").await;
            let (_, clips) =
                send(&app, json_request(Method::GET, "/clipboards", Some(&again), json!({}))).await;
            assert_eq!(clips["count"], 0, "{name}");

            // The old token's subject no longer owns anything it can create
            let (status, _) =
                send(&app, text_request(Method::POST, "/clipboards", Some(&alice), "ghost")).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{name}");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = build_router(app_state(Stores::memory(), TokenTransport::Header));
        let (status, _) = send(&app, text_request(Method::GET, "/nope", None, "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
