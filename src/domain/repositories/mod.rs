//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`, and `mockall` mocks are generated
//! for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link CRUD and click accounting
//! - [`AnalyticsRepository`] - Append-only click events and reports
//! - [`RateLimitRepository`] - Per-IP failed authentication tracking
//!
//! None of the operations span a transaction; each method is one statement.

pub mod analytics_repository;
pub mod link_repository;
pub mod rate_limit_repository;

pub use analytics_repository::{AnalyticsFilter, AnalyticsRepository, CountEntry, LinkSummary};
pub use link_repository::LinkRepository;
pub use rate_limit_repository::RateLimitRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use rate_limit_repository::MockRateLimitRepository;
