use axum::{routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::{handlers, AppState};

/// All routes of the host: runtime configuration plus the frontend bundle.
pub fn configure_routes(state: AppState) -> Router {
    let static_dir = state.config.static_dir();
    let index = static_dir.join("index.html");

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/config", get(handlers::client_config::get))
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
        .with_state(state)
}
