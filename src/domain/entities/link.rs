//! Link entity representing a short-code-to-destination mapping.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// `click_count` and `last_clicked` are maintained by the redirect path and
/// reset together by an explicit statistics reset.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub destination_url: String,
    pub notes: Option<String>,
    pub click_count: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a Link that has never been clicked.
    pub fn new(
        id: i64,
        short_code: String,
        destination_url: String,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            destination_url,
            notes,
            click_count: 0,
            last_clicked: None,
            created_at,
        }
    }

    /// Builds the redirect target for a request carrying `query`.
    ///
    /// A destination that already has a query component is returned as is.
    /// Otherwise the request's query string is appended verbatim. `query`
    /// excludes the leading `?`.
    pub fn destination_with_query(&self, query: Option<&str>) -> String {
        if self.destination_url.contains('?') {
            return self.destination_url.clone();
        }

        match query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.destination_url, q),
            _ => self.destination_url.clone(),
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub short_code: String,
    pub destination_url: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Replacement values for an existing link.
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub short_code: String,
    pub destination_url: String,
    /// `None` leaves the stored notes unchanged.
    pub notes: Option<String>,
}
