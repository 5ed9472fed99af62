//! Read side of click analytics: the admin listing and per-link reports.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{AnalyticsEvent, Link};
use crate::domain::repositories::{AnalyticsFilter, AnalyticsRepository, LinkRepository, LinkSummary};
use crate::error::AppError;

/// Events shown on a per-link report.
pub const RECENT_EVENTS_LIMIT: i64 = 100;

/// Entries in each top-N list of a report.
pub const TOP_ENTRIES: i64 = 10;

/// Everything shown for one link on the analytics page.
#[derive(Debug, Clone)]
pub struct LinkReport {
    pub link: Link,
    pub summary: LinkSummary,
    pub recent: Vec<AnalyticsEvent>,
}

pub struct AnalyticsService {
    links: Arc<dyn LinkRepository>,
    analytics: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    pub fn new(links: Arc<dyn LinkRepository>, analytics: Arc<dyn AnalyticsRepository>) -> Self {
        Self { links, analytics }
    }

    /// Lists one page of events matching `filter`, newest first, with the
    /// total match count.
    pub async fn list(
        &self,
        filter: AnalyticsFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<AnalyticsEvent>, i64), AppError> {
        let offset = page.saturating_sub(1).max(0).saturating_mul(limit);
        let (events, total) = tokio::try_join!(
            self.analytics.list(filter.clone(), offset, limit),
            self.analytics.count(filter)
        )?;

        Ok((events, total))
    }

    /// Builds the report for `short_code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the short code is unknown.
    pub async fn link_report(&self, short_code: &str) -> Result<LinkReport, AppError> {
        let link = self
            .links
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "LINK_NOT_FOUND",
                    "Link not found",
                    json!({ "short_code": short_code }),
                )
            })?;

        let (summary, recent) = tokio::try_join!(
            self.analytics.summary_for_link(link.id, TOP_ENTRIES),
            self.analytics.recent_for_link(link.id, RECENT_EVENTS_LIMIT)
        )?;

        Ok(LinkReport {
            link,
            summary,
            recent,
        })
    }
}
