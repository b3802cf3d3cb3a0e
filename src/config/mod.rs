//! Application configuration module
//!
//! Environment-driven settings plus the constants shared by the
//! validator, the repositories and the dashboards.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
