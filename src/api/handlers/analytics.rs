//! Handler for the admin analytics listing.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::analytics::{AnalyticsListResponse, AnalyticsQuery};
use crate::api::dto::pagination::PaginationInfo;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Lists click events joined with their link, newest first.
///
/// # Endpoint
///
/// `GET /api/admin/analytics?page=&limit=&linkId=&country=&dateFrom=&dateTo=`
///
/// `limit` defaults to 50 and is capped at 200. Date bounds compare against
/// the stored ISO timestamps. The applied filters are echoed back.
pub async fn list_analytics_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsListResponse>, AppError> {
    let (page, limit) = query.pagination.resolve(DEFAULT_LIMIT, MAX_LIMIT);
    let filter = query.filter();

    let (events, total) = state
        .analytics_service
        .list(filter.clone(), page, limit)
        .await?;

    Ok(Json(AnalyticsListResponse {
        analytics: events,
        pagination: PaginationInfo::new(page, limit, total),
        filters: filter.into(),
    }))
}
