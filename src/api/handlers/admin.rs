//! Fallback for unknown admin endpoints.

use axum::extract::OriginalUri;
use axum::http::Method;
use serde_json::json;

use crate::error::AppError;

/// Answers any admin path or method without a handler. Runs after
/// authentication.
pub async fn endpoint_not_found_handler(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(
        "ENDPOINT_NOT_FOUND",
        "Endpoint not found",
        json!({
            "path": uri.path(),
            "method": method.as_str(),
            "hint": "Valid endpoints: GET /api/admin/links, POST /api/admin/links, PUT /api/admin/links/:id, DELETE /api/admin/links/:id, POST /api/admin/links/:id/reset, GET /api/admin/analytics"
        }),
    )
}
