//! Tests for users module
//!
//! These tests verify account self-service through the HTTP routes:
//! - Profile lookup without the credential
//! - Rename, including the conflict path
//! - Password rotation
//! - Account deletion

#[cfg(test)]
mod tests {
    use super::super::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::common::test_support::{json_request, memory_app, register_and_login, send};
    use crate::common::Validator;

    #[test]
    fn test_rename_request_validation() {
        let valid = models::RenameRequest {
            username: "alicia".to_string(),
        };
        assert!(valid.validate().is_valid);

        let invalid = models::RenameRequest {
            username: "ali\tcia".to_string(),
        };
        let result = invalid.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "username");
    }

    #[test]
    fn test_change_password_request_validation() {
        let request = models::ChangePasswordRequest {
            current_password: String::new(),
            new_password: "x".repeat(1025),
        };
        let result = request.validate();

        assert!(!result.is_valid);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["current_password", "new_password"]);
    }

    #[tokio::test]
    async fn test_get_me_hides_credential() {
        let app = memory_app();
        let (id, token) = register_and_login(&app, "alice", "hunter2").await;

        let (status, body) =
            send(&app, json_request(Method::GET, "/users/me", Some(&token), json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["username"], "alice");
        assert!(body["created_at"].is_string());
        assert!(body.get("credential").is_none());
    }

    #[tokio::test]
    async fn test_rename_then_login_with_new_name() {
        let app = memory_app();
        let (id, token) = register_and_login(&app, "alice", "hunter2").await;

        let (status, body) = send(
            &app,
            json_request(
                Method::PATCH,
                "/users/me/username",
                Some(&token),
                json!({ "username": "alicia" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alicia");

        let (status, _) = send(
            &app,
            json_request(
                Method::POST,
                "/login",
                None,
                json!({ "username": "alice", "password": "hunter2" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/login",
                None,
                json!({ "username": "alicia", "password": "hunter2" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alicia");

        // The old token still names the same account
        let (_, me) =
            send(&app, json_request(Method::GET, "/users/me", Some(&token), json!({}))).await;
        assert_eq!(me["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_change_password() {
        let app = memory_app();
        let (_, token) = register_and_login(&app, "alice", "hunter2").await;

        let (status, body) = send(
            &app,
            json_request(
                Method::PATCH,
                "/users/me/password",
                Some(&token),
                json!({ "current_password": "wrong", "new_password": "correct-horse" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid credentials");

        let (status, _) = send(
            &app,
            json_request(
                Method::PATCH,
                "/users/me/password",
                Some(&token),
                json!({ "current_password": "hunter2", "new_password": "correct-horse" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let login = |password: &str| {
            json_request(
                Method::POST,
                "/login",
                None,
                json!({ "username": "alice", "password": password }),
            )
        };
        assert_eq!(send(&app, login("hunter2")).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(send(&app, login("correct-horse")).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_me_frees_username() {
        let app = memory_app();
        let (_, token) = register_and_login(&app, "alice", "hunter2").await;

        let (status, body) =
            send(&app, json_request(Method::DELETE, "/users/me", Some(&token), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "account deleted");

        let (status, _) =
            send(&app, json_request(Method::GET, "/users/me", Some(&token), json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&app, json_request(Method::DELETE, "/users/me", Some(&token), json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        register_and_login(&app, "alice", "new-password").await;
    }
}
