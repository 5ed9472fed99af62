//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod analytics;
pub mod analytics_page;
pub mod health;
pub mod links;
pub mod redirect;

pub use admin::endpoint_not_found_handler;
pub use analytics::list_analytics_handler;
pub use analytics_page::{analytics_index_handler, analytics_page_handler};
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, list_links_handler, reset_link_stats_handler,
    update_link_handler,
};
pub use redirect::{not_found_handler, redirect_handler, root_handler};
