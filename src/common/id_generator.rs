// src/common/id_generator.rs
//! Identifier generation for accounts and clips
//!
//! Ids are random UUIDv4 strings. They are opaque to clients: handed out at
//! creation, echoed back in path segments, never parsed.

use uuid::Uuid;

pub fn generate_account_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn generate_clip_id() -> String {
    Uuid::new_v4().to_string()
}
