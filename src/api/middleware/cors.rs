//! Cross-origin access for browser-based admin tools.

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS: any origin, the admin API's methods and the
/// `Content-Type` and `Authorization` request headers.
///
/// Preflight `OPTIONS` requests are answered by the layer itself and never
/// reach the admin gate.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
