//! Handler for the per-link analytics view.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::api::dto::AdminKeyQuery;
use crate::api::dto::analytics::LinkReportResponse;
use crate::application::services::MissingKey;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::ClientIp;

fn plain(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

/// Serves the analytics report of one link.
///
/// # Endpoint
///
/// `GET /analytics/{code}?key=ADMIN_KEY`
///
/// Gated like the admin API, except that a request without a key also
/// counts as a failed attempt. Errors are plain text:
///
/// - **429**: `Too many failed attempts. Please try again in N minutes.`
///   with `Retry-After` in seconds
/// - **401**: `Unauthorized`
/// - **404**: `Link not found`
pub async fn analytics_page_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(auth): Query<AdminKeyQuery>,
    client_ip: ClientIp,
) -> Response {
    report_page(&state, &code, auth, client_ip).await
}

/// `GET /analytics` without a code. Still gated, then answered as an
/// unknown link.
pub async fn analytics_index_handler(
    State(state): State<AppState>,
    Query(auth): Query<AdminKeyQuery>,
    client_ip: ClientIp,
) -> Response {
    report_page(&state, "", auth, client_ip).await
}

async fn report_page(
    state: &AppState,
    code: &str,
    auth: AdminKeyQuery,
    client_ip: ClientIp,
) -> Response {
    let gate = state
        .admin_gate
        .authorize(
            client_ip.or_unknown(),
            auth.key.as_deref(),
            MissingKey::CountAsFailure,
        )
        .await;

    match gate {
        Ok(()) => {}
        Err(AppError::RateLimited {
            retry_after_secs, ..
        }) => {
            let minutes = (retry_after_secs + 59) / 60;
            let mut response = plain(
                StatusCode::TOO_MANY_REQUESTS,
                format!("Too many failed attempts. Please try again in {minutes} minutes."),
            );
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            return response;
        }
        Err(_) => return plain(StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
    }

    match state.analytics_service.link_report(code).await {
        Ok(report) => Json(LinkReportResponse {
            link: report.link.into(),
            summary: report.summary,
            recent: report.recent,
        })
        .into_response(),
        Err(AppError::NotFound { .. }) => {
            plain(StatusCode::NOT_FOUND, "Link not found".to_string())
        }
        Err(_) => plain(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error loading analytics".to_string(),
        ),
    }
}
