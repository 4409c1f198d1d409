//! # Clips Module
//!
//! Per-account clipboard entries:
//! - Create, list, read, replace and delete clips
//! - Ownership taken from the verified identity, never from the request

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::clips_routes;
