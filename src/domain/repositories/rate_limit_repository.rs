//! Repository trait for failed authentication tracking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::RateLimitRecord;
use crate::error::AppError;

/// Repository interface for the `rate_limit` table.
///
/// Every method is a single statement. The limiter reads with
/// [`RateLimitRepository::find`] and writes later without a lock, so
/// concurrent failures from one IP may be under-counted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitRepository: Send + Sync {
    async fn find(&self, ip: &str) -> Result<Option<RateLimitRecord>, AppError>;

    /// Inserts a record with `failed_attempts = 1` anchored at `now`.
    async fn insert_first_failure(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError>;

    /// Restarts the window: one attempt at `now`, block cleared.
    async fn restart_window(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError>;

    /// Increments `failed_attempts` and sets `last_attempt_at = now`.
    async fn increment(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError>;

    async fn set_blocked_until(&self, ip: &str, until: DateTime<Utc>) -> Result<(), AppError>;

    /// Deletes the record. Returns `Ok(true)` if one existed.
    async fn delete(&self, ip: &str) -> Result<bool, AppError>;

    /// All records, most recent attempt first.
    async fn list(&self) -> Result<Vec<RateLimitRecord>, AppError>;
}
