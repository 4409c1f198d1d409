//! Clip handlers
//!
//! Every handler passes the caller's verified id to the store as the owner.
//! A clip id that exists but belongs to someone else yields the same 404 as
//! one that does not exist.

use axum::{
    body::Bytes,
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;

use super::models::{Clip, ClipListResponse, DeleteAllResponse};
use super::validators::clip_text;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /clipboards
/// Stores the raw request body as a new clip owned by the caller
pub async fn create_clip(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    body: Bytes,
) -> Result<(StatusCode, Json<Clip>), ApiError> {
    let text = clip_text(&body)?;
    let clip = state.clips.create(&user.id, &text).await?;

    info!(clip_id = %clip.id, user_id = %user.id, bytes = text.len(), "Clip created");
    Ok((StatusCode::CREATED, Json(clip)))
}

/// GET /clipboards
pub async fn list_clips(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<ClipListResponse>, ApiError> {
    let clips = state.clips.list_owned(&user.id).await?;
    let count = clips.len();
    Ok(Json(ClipListResponse { clips, count }))
}

/// GET /clipboards/:clip_id
pub async fn get_clip(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(clip_id): Path<String>,
) -> Result<Json<Clip>, ApiError> {
    let clip = state.clips.get_owned(&clip_id, &user.id).await?;
    Ok(Json(clip))
}

/// PATCH /clipboards/:clip_id
/// Replaces the clip's text with the raw request body
pub async fn update_clip(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(clip_id): Path<String>,
    body: Bytes,
) -> Result<Json<Clip>, ApiError> {
    let text = clip_text(&body)?;
    state.clips.update_owned(&clip_id, &user.id, &text).await?;

    let clip = state.clips.get_owned(&clip_id, &user.id).await?;
    info!(clip_id = %clip_id, user_id = %user.id, "Clip updated");
    Ok(Json(clip))
}

/// DELETE /clipboards/:clip_id
pub async fn delete_clip(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(clip_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.clips.delete_owned(&clip_id, &user.id).await?;

    info!(clip_id = %clip_id, user_id = %user.id, "Clip deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /clipboards
/// Removes every clip the caller owns; other accounts' clips are untouched
pub async fn delete_all_clips(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<DeleteAllResponse>, ApiError> {
    let deleted = state.clips.delete_all_owned(&user.id).await?;
    Ok(Json(DeleteAllResponse { deleted }))
}
