//! Business logic services for the application layer.

pub mod admin_gate;
pub mod analytics_recorder;
pub mod analytics_service;
pub mod link_service;
pub mod rate_limiter;
pub mod redirect_service;

pub use admin_gate::{AdminGate, MissingKey};
pub use analytics_recorder::AnalyticsRecorder;
pub use analytics_service::{AnalyticsService, LinkReport};
pub use link_service::{CreateLink, LinkService};
pub use rate_limiter::{RateLimitDecision, RateLimitPolicy, RateLimiter};
pub use redirect_service::{RedirectService, RedirectTarget};
