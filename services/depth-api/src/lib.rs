//! Depth image API service library.
//!
//! Exposes the router and its parts so the binary and the integration tests
//! build the exact same service.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod startup;
pub mod state;

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use state::AppState;

/// All routes with shared state and the HTTP middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Inline images
        .route("/original-image", get(handlers::original_image_handler))
        .route("/resized-image", get(handlers::resized_image_handler))
        .route("/depth-range-image", get(handlers::depth_range_image_handler))
        // Attachments
        .route("/download-original", get(handlers::download_original_handler))
        .route("/download-resized", get(handlers::download_resized_handler))
        .route("/download-depth-range", get(handlers::download_depth_range_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
