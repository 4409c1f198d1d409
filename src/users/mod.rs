//! # Users Module
//!
//! Self-service account management: profile, rename, password rotation and
//! account deletion.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::users_routes;
