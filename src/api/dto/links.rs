//! DTOs for the admin link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::pagination::{PageParams, PaginationInfo};
use crate::domain::entities::Link;

/// Query of `GET /api/admin/links`.
#[derive(Debug, Deserialize)]
pub struct ListLinksQuery {
    #[serde(flatten)]
    pub pagination: PageParams,

    pub search: Option<String>,
}

/// Body of `POST /api/admin/links`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Generated when absent.
    #[validate(length(max = 64))]
    pub short_code: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "destinationUrl is required"))]
    pub destination_url: String,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Body of `PUT /api/admin/links/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "shortCode is required"))]
    pub short_code: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "destinationUrl is required"))]
    pub destination_url: String,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// A link as listed by the admin API.
#[derive(Debug, Serialize)]
pub struct LinkDto {
    pub id: i64,
    pub short_code: String,
    pub destination_url: String,
    pub notes: Option<String>,
    pub click_count: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkDto {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            destination_url: link.destination_url,
            notes: link.notes,
            click_count: link.click_count,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkDto>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCreatedResponse {
    pub id: i64,
    pub short_code: String,
    pub destination_url: String,
    pub notes: Option<String>,
    pub message: &'static str,
    /// Path of the short link, e.g. `/docs`.
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkUpdatedResponse {
    pub message: &'static str,
    pub id: i64,
    pub short_code: String,
    pub destination_url: String,
}

#[derive(Debug, Serialize)]
pub struct LinkDeletedResponse {
    pub message: &'static str,
    pub id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResetResponse {
    pub message: &'static str,
    pub id: i64,
    pub analytics_records_deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_camel_case() {
        let req: CreateLinkRequest = serde_json::from_str(
            r#"{"shortCode": "docs", "destinationUrl": "https://example.com", "notes": "n"}"#,
        )
        .unwrap();

        assert_eq!(req.short_code.as_deref(), Some("docs"));
        assert_eq!(req.destination_url, "https://example.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_missing_destination_fails_validation() {
        let req: CreateLinkRequest = serde_json::from_str(r#"{"shortCode": "docs"}"#).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_requires_short_code() {
        let req: UpdateLinkRequest =
            serde_json::from_str(r#"{"destinationUrl": "https://example.com"}"#).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("short_code"));
    }
}
