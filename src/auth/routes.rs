//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Routes reachable without a token
///
/// # Routes
/// - `POST /register` - Create an account
/// - `POST /login` - Exchange credentials for a token
/// - `GET /health` - Liveness probe
pub fn public_routes() -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/health", get(handlers::health))
}

/// Routes that need a verified identity
pub fn protected_routes() -> Router {
    Router::new().route("/whoami", get(handlers::whoami))
}
