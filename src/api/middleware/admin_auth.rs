//! Admin key middleware for the `/api/admin` routes.

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::dto::AdminKeyQuery;
use crate::application::services::MissingKey;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::ClientIp;

/// Checks the `key` query parameter against the admin key.
///
/// # Query Format
///
/// ```text
/// /api/admin/links?key=<admin key>
/// ```
///
/// # Flow
///
/// 1. Reject blocked client IPs with `429` and `Retry-After`
/// 2. Reject a missing key with `401 MISSING_ADMIN_KEY` (not counted)
/// 3. Reject a wrong key with `401 INVALID_ADMIN_KEY` and count the failure
/// 4. Clear the IP's failure record and continue
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/links", get(list_links_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), admin_auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let key = Query::<AdminKeyQuery>::from_request_parts(&mut parts, &st)
        .await
        .map(|Query(q)| q.key)
        .unwrap_or_default();

    let client_ip = match ClientIp::from_request_parts(&mut parts, &st).await {
        Ok(ip) => ip,
        Err(never) => match never {},
    };

    st.admin_gate
        .authorize(client_ip.or_unknown(), key.as_deref(), MissingKey::Reject)
        .await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
