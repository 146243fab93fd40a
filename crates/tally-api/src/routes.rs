use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::features;

/// Assemble the REST surface. Auth requirements live on the handlers
/// themselves (`AuthUser` / `Viewer` extractors), so public and protected
/// methods can share a path. The WebSocket gateway route is wired by the
/// server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/features",
            get(features::list_features).post(features::create_feature),
        )
        .route("/features/{id}/upvote", post(features::upvote_feature))
        .with_state(state)
}
