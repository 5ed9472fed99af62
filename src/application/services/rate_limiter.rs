//! IP-scoped brute-force limiter for the admin key check.
//!
//! State per IP is derived lazily from the stored timestamps; nothing sweeps
//! expired records. The limiter fails open: a storage error never turns into
//! a rejection.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::clock::Clock;
use crate::domain::repositories::RateLimitRepository;
use crate::error::AppError;

/// Thresholds for the limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: i32,
    pub window: Duration,
    pub block_duration: Duration,
}

impl RateLimitPolicy {
    pub fn from_minutes(max_attempts: i32, window_minutes: i64, block_minutes: i64) -> Self {
        Self {
            max_attempts,
            window: Duration::minutes(window_minutes),
            block_duration: Duration::minutes(block_minutes),
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::from_minutes(10, 15, 60)
    }
}

/// Outcome of [`RateLimiter::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Blocked {
        retry_after_secs: i64,
        message: String,
    },
}

impl RateLimitDecision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, RateLimitDecision::Blocked { .. })
    }
}

pub struct RateLimiter {
    repository: Arc<dyn RateLimitRepository>,
    clock: Arc<dyn Clock>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(
        repository: Arc<dyn RateLimitRepository>,
        clock: Arc<dyn Clock>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Decides whether `ip` may attempt authentication.
    ///
    /// A record that reached `max_attempts` inside its window is blocked
    /// here, at check time, by writing `blocked_until`. The failure that
    /// crossed the threshold was itself answered normally; only the next
    /// check rejects.
    pub async fn check(&self, ip: &str) -> RateLimitDecision {
        let record = match self.repository.find(ip).await {
            Ok(Some(record)) => record,
            Ok(None) => return RateLimitDecision::Allowed,
            Err(e) => {
                tracing::error!(ip, error = %e, "Rate limit check failed, allowing request");
                return RateLimitDecision::Allowed;
            }
        };

        let now = self.clock.now();

        if let Some(until) = record.blocked_at(now) {
            let retry_after_secs = ceil_secs(until - now);
            let minutes_left = ceil_div(retry_after_secs, 60);
            return RateLimitDecision::Blocked {
                retry_after_secs,
                message: format!(
                    "Too many failed authentication attempts from IP {ip}. Blocked for {minutes_left} more minute(s). Please try again at {}.",
                    until.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
                ),
            };
        }

        if record.window_expired(now, self.policy.window) {
            return RateLimitDecision::Allowed;
        }

        if record.failed_attempts >= self.policy.max_attempts {
            let until = now + self.policy.block_duration;
            if let Err(e) = self.repository.set_blocked_until(ip, until).await {
                tracing::error!(ip, error = %e, "Rate limit check failed, allowing request");
                return RateLimitDecision::Allowed;
            }

            tracing::warn!(
                ip,
                failed_attempts = record.failed_attempts,
                blocked_until = %until,
                "IP blocked after too many failed attempts"
            );

            return RateLimitDecision::Blocked {
                retry_after_secs: self.policy.block_duration.num_seconds(),
                message: format!(
                    "Rate limit exceeded: {} failed attempts within {} minutes. IP {ip} is now blocked for {} minutes. Try again at {}.",
                    record.failed_attempts,
                    self.policy.window.num_minutes(),
                    self.policy.block_duration.num_minutes(),
                    until.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
                ),
            };
        }

        RateLimitDecision::Allowed
    }

    /// Records one failed key check for `ip`. Errors are logged only.
    pub async fn record_failure(&self, ip: &str) {
        if let Err(e) = self.try_record_failure(ip).await {
            tracing::error!(ip, error = %e, "Failed to record failed attempt");
        }
    }

    async fn try_record_failure(&self, ip: &str) -> Result<(), AppError> {
        let now = self.clock.now();
        let max = self.policy.max_attempts;

        match self.repository.find(ip).await? {
            None => {
                self.repository.insert_first_failure(ip, now).await?;
                tracing::warn!(ip, "Failed attempt 1/{max}");
            }
            Some(record) if record.window_expired(now, self.policy.window) => {
                self.repository.restart_window(ip, now).await?;
                tracing::warn!(ip, "Failed attempt 1/{max} (window reset)");
            }
            Some(record) => {
                self.repository.increment(ip, now).await?;
                let attempts = record.failed_attempts + 1;
                if attempts >= max {
                    tracing::warn!(ip, "Failed attempt {attempts}/{max} - RATE LIMIT TRIGGERED");
                } else {
                    tracing::warn!(ip, "Failed attempt {attempts}/{max}");
                }
            }
        }

        Ok(())
    }

    /// Forgets every failure of `ip` after a successful authentication.
    pub async fn clear(&self, ip: &str) {
        match self.repository.delete(ip).await {
            Ok(true) => tracing::info!(ip, "Successful login, rate limit cleared"),
            Ok(false) => {}
            Err(e) => tracing::error!(ip, error = %e, "Failed to clear rate limit"),
        }
    }
}

fn ceil_secs(d: Duration) -> i64 {
    let millis = d.num_milliseconds();
    ceil_div(millis, 1000)
}

fn ceil_div(n: i64, d: i64) -> i64 {
    (n + d - 1).div_euclid(d)
}
