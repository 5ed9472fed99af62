//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`                  - Redirect to the default destination
//! - `GET  /health`            - Liveness probe
//! - `GET  /analytics/{code}`  - Per-link analytics report (admin key)
//! - `GET  /analytics`         - Same gate, no link (404 once authorized)
//! - `GET  /{code}`            - Short link redirect
//! - `/api/admin/*`            - Admin API (admin key)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, answers preflight requests
//! - **Path normalization** - Trailing slash handling

use axum::{Router, routing::get};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::{
    analytics_index_handler, analytics_page_handler, health_handler, not_found_handler,
    redirect_handler, root_handler,
};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/analytics", get(analytics_index_handler))
        .route("/analytics/{code}", get(analytics_page_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api/admin", api::routes::admin_routes(state.clone()))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
