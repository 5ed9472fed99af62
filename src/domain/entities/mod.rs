//! Core domain entities.
//!
//! - [`Link`] - A short-code-to-destination mapping
//! - [`AnalyticsEvent`] - A click recorded against a link
//! - [`RateLimitRecord`] - Failed authentication tracking for one IP
//!
//! Creation inputs live next to their entity (`NewLink`, `NewAnalyticsEvent`).

pub mod analytics_event;
pub mod link;
pub mod rate_limit;

pub use analytics_event::{AnalyticsEvent, DeviceType, NewAnalyticsEvent};
pub use link::{Link, LinkUpdate, NewLink};
pub use rate_limit::RateLimitRecord;
