//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx
//! runtime queries mapped onto `FromRow` entities.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and click counters
//! - [`PgAnalyticsRepository`] - Click events and per-link aggregates
//! - [`PgRateLimitRepository`] - Failed authentication tracking

pub mod pg_analytics_repository;
pub mod pg_link_repository;
pub mod pg_rate_limit_repository;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_rate_limit_repository::PgRateLimitRepository;
