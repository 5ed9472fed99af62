//! Rate-limit record entity: brute-force tracking for one source IP.

use chrono::{DateTime, Duration, Utc};

/// Failed-authentication bookkeeping for one IP address.
///
/// The record carries no explicit state field; whether the IP is tracked,
/// blocked or clean is derived from the timestamps at the moment of asking.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RateLimitRecord {
    pub ip_address: String,
    pub failed_attempts: i32,
    pub first_attempt_at: DateTime<Utc>,
    pub last_attempt_at: DateTime<Utc>,
    pub blocked_until: Option<DateTime<Utc>>,
}

impl RateLimitRecord {
    /// Returns the block expiry if the IP is blocked at `now`.
    pub fn blocked_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.blocked_until.filter(|until| now < *until)
    }

    /// Returns true once `now` is past the window anchored at the first
    /// failure.
    pub fn window_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now > self.first_attempt_at + window
    }
}
