use super::handlers;
use axum::{
    routing::{get, patch},
    Router,
};

/// Creates the account router; every route here sits behind `require_identity`
pub fn users_routes() -> Router {
    Router::new()
        .route(
            "/users/me",
            get(handlers::get_me).delete(handlers::delete_me),
        )
        .route("/users/me/username", patch(handlers::rename_me))
        .route("/users/me/password", patch(handlers::change_password))
}
