//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod analytics;
pub mod links;
pub mod pagination;

/// The `key` query parameter carrying the admin secret.
#[derive(Debug, Default, serde::Deserialize)]
pub struct AdminKeyQuery {
    pub key: Option<String>,
}
