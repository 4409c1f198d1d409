//! # Auth Module
//!
//! This module handles authentication:
//! - Registration and login with encrypted-at-rest credentials
//! - Signed token issuing and verification
//! - The identity propagation middleware guarding protected routes
//! - AuthedUser extractor for protected handlers

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod tokens;
pub mod validators;


pub use extractors::AuthedUser;
pub use middleware::require_identity;
pub use routes::{protected_routes, public_routes};
