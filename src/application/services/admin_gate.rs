//! Shared-secret check for administrative endpoints, fronted by the
//! rate limiter.

use std::sync::Arc;

use serde_json::json;
use subtle::ConstantTimeEq;

use crate::application::services::{RateLimitDecision, RateLimiter};
use crate::error::AppError;

/// How a request without any key is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKey {
    /// Reject with 401 without touching the limiter (admin API).
    Reject,
    /// Reject with 401 and count it as a failed attempt (analytics page).
    CountAsFailure,
}

pub struct AdminGate {
    limiter: Arc<RateLimiter>,
    admin_key: String,
}

impl AdminGate {
    pub fn new(limiter: Arc<RateLimiter>, admin_key: String) -> Self {
        Self { limiter, admin_key }
    }

    /// Authorizes one request from `ip` presenting `key`.
    ///
    /// Order matters: a blocked IP is rejected before the key is compared,
    /// so the comparison cannot be probed while blocked. A matching key
    /// clears the IP's failure record.
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimited`] while the IP is blocked
    /// - [`AppError::Unauthorized`] with `MISSING_ADMIN_KEY` or `INVALID_ADMIN_KEY`
    pub async fn authorize(
        &self,
        ip: &str,
        key: Option<&str>,
        missing: MissingKey,
    ) -> Result<(), AppError> {
        if let RateLimitDecision::Blocked {
            retry_after_secs,
            message,
        } = self.limiter.check(ip).await
        {
            return Err(AppError::rate_limited(message, retry_after_secs));
        }

        let Some(key) = key.filter(|k| !k.is_empty()) else {
            if missing == MissingKey::CountAsFailure {
                self.limiter.record_failure(ip).await;
            }
            return Err(AppError::unauthorized(
                "MISSING_ADMIN_KEY",
                "Authentication required: Missing admin key",
                json!({ "hint": "Add ?key=YOUR_ADMIN_KEY to the URL." }),
            ));
        };

        if !self.key_matches(key) {
            self.limiter.record_failure(ip).await;
            return Err(AppError::unauthorized(
                "INVALID_ADMIN_KEY",
                "Authentication failed: Invalid admin key",
                json!({ "hint": "Check that your admin key is correct. Keys are case-sensitive." }),
            ));
        }

        self.limiter.clear(ip).await;
        Ok(())
    }

    fn key_matches(&self, candidate: &str) -> bool {
        candidate
            .as_bytes()
            .ct_eq(self.admin_key.as_bytes())
            .into()
    }
}
