//! Handlers for admin link management.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, LinkCreatedResponse, LinkDeletedResponse, LinkListResponse,
    ListLinksQuery, StatsResetResponse, UpdateLinkRequest, LinkUpdatedResponse,
};
use crate::api::dto::pagination::PaginationInfo;
use crate::application::services::CreateLink;
use crate::domain::entities::LinkUpdate;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/admin/links?page=1&limit=20&search=docs`
///
/// `limit` defaults to 20 and is capped at 100. `search` matches a substring
/// of the short code or the destination.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, limit) = query.pagination.resolve(DEFAULT_LIMIT, MAX_LIMIT);
    let search = query.search.filter(|s| !s.is_empty());

    let (links, total) = state.link_service.list(page, limit, search).await?;

    Ok(Json(LinkListResponse {
        links: links.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, limit, total),
    }))
}

/// Creates a link.
///
/// # Endpoint
///
/// `POST /api/admin/links`
///
/// ```json
/// { "shortCode": "docs", "destinationUrl": "https://example.com/docs", "notes": "optional" }
/// ```
///
/// `shortCode` may be omitted to get a random 5-character code.
///
/// # Errors
///
/// - **400** for a non-HTTPS, malformed or private destination, or a
///   reserved short code
/// - **409** `SHORTCODE_ALREADY_EXISTS`
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<LinkCreatedResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(CreateLink {
            short_code: payload.short_code,
            destination_url: payload.destination_url,
            notes: payload.notes,
        })
        .await?;

    Ok(Json(LinkCreatedResponse {
        id: link.id,
        url: format!("/{}", link.short_code),
        short_code: link.short_code,
        destination_url: link.destination_url,
        notes: link.notes,
        message: "Link created successfully",
    }))
}

/// Replaces short code, destination and notes of a link.
///
/// # Endpoint
///
/// `PUT /api/admin/links/{id}`
pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkUpdatedResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update(
            id,
            LinkUpdate {
                short_code: payload.short_code,
                destination_url: payload.destination_url,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(LinkUpdatedResponse {
        message: "Link updated successfully",
        id: link.id,
        short_code: link.short_code,
        destination_url: link.destination_url,
    }))
}

/// Deletes a link together with its analytics.
///
/// # Endpoint
///
/// `DELETE /api/admin/links/{id}`
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LinkDeletedResponse>, AppError> {
    state.link_service.delete(id).await?;

    Ok(Json(LinkDeletedResponse {
        message: "Link deleted successfully",
        id,
    }))
}

/// Zeroes a link's click counter and deletes its analytics.
///
/// # Endpoint
///
/// `POST /api/admin/links/{id}/reset`
pub async fn reset_link_stats_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatsResetResponse>, AppError> {
    let deleted = state.link_service.reset_stats(id).await?;

    Ok(Json(StatsResetResponse {
        message: "Link statistics reset successfully",
        id,
        analytics_records_deleted: deleted,
    }))
}
