//! Admin API route configuration.
//!
//! Every route, including the fallback, sits behind
//! [`crate::api::middleware::admin_auth`].

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::api::handlers::{
    create_link_handler, delete_link_handler, endpoint_not_found_handler, list_analytics_handler,
    list_links_handler, reset_link_stats_handler, update_link_handler,
};
use crate::api::middleware::admin_auth;
use crate::state::AppState;

/// Admin routes, mounted under `/api/admin`.
///
/// # Endpoints
///
/// - `GET    /links`             - List links (paginated, searchable)
/// - `POST   /links`             - Create a link
/// - `PUT    /links/{id}`        - Replace a link's code, destination and notes
/// - `DELETE /links/{id}`        - Delete a link and its analytics
/// - `POST   /links/{id}/reset`  - Reset a link's click statistics
/// - `GET    /analytics`         - List click events (paginated, filterable)
///
/// Anything else answers `404 ENDPOINT_NOT_FOUND` once authenticated.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route("/links/{id}/reset", post(reset_link_stats_handler))
        .route("/analytics", get(list_analytics_handler))
        .fallback(endpoint_not_found_handler)
        .method_not_allowed_fallback(endpoint_not_found_handler)
        .layer(middleware::from_fn_with_state(state, admin_auth::layer))
}
