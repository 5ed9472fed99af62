//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Highest page number honoured; larger values are clamped.
pub const MAX_PAGE: i64 = 1_000_000;

/// `page` / `limit` query parameters.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageParams {
    /// Returns `(page, limit)`.
    ///
    /// Page defaults to 1 and is clamped to `1..=MAX_PAGE`. Limit defaults to
    /// `default_limit` and is clamped to `1..=max_limit`.
    pub fn resolve(&self, default_limit: i64, max_limit: i64) -> (i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit);
        (page, limit)
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PaginationInfo {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}
