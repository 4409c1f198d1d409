use super::handlers;
use axum::{routing::get, Router};

/// Creates the clips router; every route here sits behind `require_identity`
pub fn clips_routes() -> Router {
    Router::new()
        .route(
            "/clipboards",
            get(handlers::list_clips)
                .post(handlers::create_clip)
                .delete(handlers::delete_all_clips),
        )
        .route(
            "/clipboards/:clip_id",
            get(handlers::get_clip)
                .patch(handlers::update_clip)
                .delete(handlers::delete_clip),
        )
}
