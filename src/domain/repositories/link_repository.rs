//! Repository trait for short link data access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Link, LinkUpdate, NewLink};
use crate::error::AppError;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by exact, case-sensitive short code.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Lists links newest first.
    ///
    /// `search` matches a substring of either the short code or the
    /// destination.
    async fn list(
        &self,
        offset: i64,
        limit: i64,
        search: Option<String>,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts links matching the same `search` as [`LinkRepository::list`].
    async fn count(&self, search: Option<String>) -> Result<i64, AppError>;

    /// Replaces short code, destination and notes of a link.
    ///
    /// Returns `Ok(None)` if no link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new short code belongs to another link.
    async fn update(&self, id: i64, update: LinkUpdate) -> Result<Option<Link>, AppError>;

    /// Deletes a link and, through the foreign key, its analytics rows.
    ///
    /// Returns `Ok(false)` if no link has this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Increments `click_count` by one and sets `last_clicked = at`.
    async fn record_click(&self, id: i64, at: DateTime<Utc>) -> Result<(), AppError>;

    /// Sets `click_count = 0` and clears `last_clicked`.
    ///
    /// Returns `Ok(false)` if no link has this id.
    async fn reset_stats(&self, id: i64) -> Result<bool, AppError>;
}
