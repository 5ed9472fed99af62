//! HTTP middleware for request processing and protection.
//!
//! Provides the admin key gate, CORS and observability middleware.

pub mod admin_auth;
pub mod cors;
pub mod tracing;
