//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_file, get_file, get_file_content, list_files, update_file, upload_file, AppState,
};
use super::middleware::create_cors_layer;
use crate::config::ServerConfig;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    let file_routes = Router::new()
        .route("/upload", post(upload_file))
        .route("/list", get(list_files))
        .route("/list/:id", get(get_file))
        .route("/content/:id", get(get_file_content))
        .route("/update/:id", put(update_file))
        .route("/delete/:id", delete(delete_file));

    Router::new()
        .nest("/api/files", file_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(DefaultBodyLimit::max(config.max_body_size_bytes())),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
