//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Destination URL policy
//! - [`client_ip`] - Client address resolution and the [`client_ip::ClientIp`] extractor
//! - [`request_metadata`] - Geo and network attributes from edge headers

pub mod client_ip;
pub mod code_generator;
pub mod request_metadata;
pub mod url_validator;
