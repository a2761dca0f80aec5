//! HTTP service implementations

pub mod hdkey;
pub mod health;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router: API routes first, static files for the rest
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/api/gen", post(hdkey::generate))
        .route("/health", get(health::check))
        .fallback_service(static_files)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
