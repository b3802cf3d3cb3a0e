//! HTTP request handlers.

pub mod dashboard_handler;
pub mod parcel_handler;
pub mod user_handler;

pub use dashboard_handler::dashboard_routes;
pub use parcel_handler::parcel_routes;
pub use user_handler::user_routes;
