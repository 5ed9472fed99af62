//! Application layer services implementing business logic.
//!
//! Services consume repository traits and an injected clock, and provide the
//! API used by HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::RedirectService`] - Short code resolution and click accounting
//! - [`services::AnalyticsRecorder`] - Best-effort click event recording
//! - [`services::RateLimiter`] - Per-IP brute-force limiter
//! - [`services::AdminGate`] - Admin key check fronted by the limiter
//! - [`services::LinkService`] - Link CRUD for the admin API
//! - [`services::AnalyticsService`] - Analytics listing and per-link reports

pub mod services;
