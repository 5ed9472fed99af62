//! Handlers for short link redirects.

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, Uri, Version, header},
    response::{IntoResponse, Response},
};

use crate::domain::click_context::ClickContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::ClientIp;
use crate::utils::request_metadata::geo_from_headers;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

fn permanent_redirect(location: String) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

fn not_found_text(short_code: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, PLAIN_TEXT)],
        format!(
            "Short link not found: /{short_code}\n\nThis short link does not exist. Please check the URL and try again."
        ),
    )
        .into_response()
}

fn service_error_text() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, PLAIN_TEXT)],
        "Service Error\n\nAn error occurred while processing your request. Please try again later.\n\nError Code: REDIRECT_FAILED",
    )
        .into_response()
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn resolve(
    state: &AppState,
    short_code: &str,
    query: Option<String>,
    client_ip: ClientIp,
    headers: &HeaderMap,
    version: Version,
) -> Response {
    let ctx = ClickContext::new(
        client_ip.0,
        header_text(headers, header::USER_AGENT),
        header_text(headers, header::REFERER),
        geo_from_headers(headers, version, state.trust_proxy),
    );

    match state
        .redirect_service
        .resolve(short_code, query.as_deref(), &ctx)
        .await
    {
        Ok(target) => permanent_redirect(target.location),
        Err(AppError::NotFound { .. }) => not_found_text(short_code),
        Err(_) => service_error_text(),
    }
}

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response Codes
///
/// - **301 Moved Permanently**: `Location` is the destination, with the
///   request's query string appended when the destination has none
/// - **404 Not Found**: plain-text explanation; nothing is recorded
/// - **500 Internal Server Error**: generic plain-text message
///
/// Click accounting and analytics are best-effort and never change the
/// response.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    RawQuery(query): RawQuery,
    client_ip: ClientIp,
    version: Version,
    headers: HeaderMap,
) -> Response {
    resolve(&state, &code, query, client_ip, &headers, version).await
}

/// Redirects `GET /` to the configured default destination.
pub async fn root_handler(State(state): State<AppState>) -> Response {
    match state
        .redirect_service
        .resolve("", None, &ClickContext::default())
        .await
    {
        Ok(target) => permanent_redirect(target.location),
        Err(_) => service_error_text(),
    }
}

/// Answers any unrouted path the way an unknown short code is answered.
pub async fn not_found_handler(uri: Uri) -> Response {
    not_found_text(uri.path().trim_start_matches('/'))
}
