//! HTTP request handlers.

pub mod health_handler;
pub mod page_handler;
pub mod user_handler;

pub use health_handler::health_routes;
pub use page_handler::page_routes;
pub use user_handler::{listing_route, user_routes};
