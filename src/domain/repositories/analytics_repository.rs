//! Repository trait for click analytics.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{AnalyticsEvent, NewAnalyticsEvent};
use crate::error::AppError;

/// Filters for the admin analytics listing.
///
/// Date bounds are compared against the stored text timestamps, so they are
/// expected in the same ISO form the recorder writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsFilter {
    pub link_id: Option<i64>,
    pub country: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// One bucket of a grouped count.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CountEntry {
    pub value: String,
    pub count: i64,
}

/// Aggregated statistics for a single link.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkSummary {
    pub total_clicks: i64,
    pub unique_visitors: i64,
    pub countries: i64,
    pub device_types: Vec<CountEntry>,
    pub top_countries: Vec<CountEntry>,
    pub top_referers: Vec<CountEntry>,
}

/// Repository interface for the append-only analytics table.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Appends one click event.
    async fn insert(&self, event: NewAnalyticsEvent) -> Result<(), AppError>;

    /// Lists events newest first, joined with their link.
    async fn list(
        &self,
        filter: AnalyticsFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AnalyticsEvent>, AppError>;

    async fn count(&self, filter: AnalyticsFilter) -> Result<i64, AppError>;

    /// Returns the `limit` most recent events of one link.
    async fn recent_for_link(
        &self,
        link_id: i64,
        limit: i64,
    ) -> Result<Vec<AnalyticsEvent>, AppError>;

    /// Aggregates the events of one link.
    ///
    /// `top_countries` and `top_referers` skip empty values and hold at most
    /// `top` entries each.
    async fn summary_for_link(&self, link_id: i64, top: i64) -> Result<LinkSummary, AppError>;

    /// Deletes every event of one link and returns how many were removed.
    async fn delete_for_link(&self, link_id: i64) -> Result<u64, AppError>;

    /// Total number of stored events.
    async fn count_all(&self) -> Result<i64, AppError>;
}
