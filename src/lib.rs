//! Parcel Tracker - parcel delivery tracking service
//!
//! Users book parcels, couriers deliver them, and dashboards summarise the
//! fleet. A booking and the sender's contact update commit together or not
//! at all; dashboard metrics are computed by grouped SQL queries.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, write payloads and their schema rules
//! - **services**: Booking workflow, user registry, dashboards
//! - **infra**: Database, repositories, unit of work
//! - **api**: HTTP handlers, extractors, and routes
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Parcel, User, UserStatus};
pub use errors::{AppError, AppResult};
