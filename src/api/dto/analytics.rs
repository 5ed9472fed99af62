//! DTOs for analytics endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::api::dto::links::LinkDto;
use crate::api::dto::pagination::{PageParams, PaginationInfo};
use crate::domain::entities::AnalyticsEvent;
use crate::domain::repositories::{AnalyticsFilter, LinkSummary};

/// Query of `GET /api/admin/analytics`.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    #[serde(flatten)]
    pub pagination: PageParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub link_id: Option<i64>,

    pub country: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl AnalyticsQuery {
    pub fn filter(&self) -> AnalyticsFilter {
        AnalyticsFilter {
            link_id: self.link_id,
            country: non_empty(self.country.clone()),
            date_from: non_empty(self.date_from.clone()),
            date_to: non_empty(self.date_to.clone()),
        }
    }
}

/// Filters echoed back with a listing.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub link_id: Option<i64>,
    pub country: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl From<AnalyticsFilter> for AppliedFilters {
    fn from(f: AnalyticsFilter) -> Self {
        Self {
            link_id: f.link_id,
            country: f.country,
            date_from: f.date_from,
            date_to: f.date_to,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsListResponse {
    pub analytics: Vec<AnalyticsEvent>,
    pub pagination: PaginationInfo,
    pub filters: AppliedFilters,
}

/// Body of the per-link analytics page.
#[derive(Debug, Serialize)]
pub struct LinkReportResponse {
    pub link: LinkDto,
    pub summary: LinkSummary,
    pub recent: Vec<AnalyticsEvent>,
}
