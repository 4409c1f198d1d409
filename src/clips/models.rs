//! Clip data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored text blob, owned by exactly one account
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub id: String,
    /// Set at creation from the caller's verified identity; never changes
    pub owner_id: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Debug)]
pub struct ClipListResponse {
    pub clips: Vec<Clip>,
    pub count: usize,
}

/// Body of `DELETE /clipboards`
#[derive(Serialize, Debug)]
pub struct DeleteAllResponse {
    pub deleted: u64,
}
