//! HTTP layer: request/response types, handlers, middleware and the admin
//! router.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Admin key gate, CORS and tracing
//! - [`routes`] - Admin route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
