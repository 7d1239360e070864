use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers::{self, AppState};
use crate::vcs::Vcs;

pub fn create_router<V: Vcs + 'static>() -> Router<AppState<V>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Repository cloning
        .route("/api/repo", post(handlers::clone_repo::<V>))
        // Commit DAG across all branches
        .route("/api/commit-tree", get(handlers::commit_tree::<V>))
        .layer(CorsLayer::permissive())
}
