//! Domain layer containing business entities and data access contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_context`] - Request metadata captured for each click
//! - [`clock`] - Time source injected into every component that writes times
//!
//! The domain layer has no dependencies on the HTTP or persistence layers.
//! Services in [`crate::application::services`] compose these pieces.

pub mod click_context;
pub mod clock;
pub mod entities;
pub mod repositories;
