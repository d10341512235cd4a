//! Placement Registry
//!
//! Persistence and integrity core for academic enrollees, departments and
//! partner organizations with their contacts. Enforces uniqueness and format
//! rules, replaces owned contact sets atomically, stores photos and logos as
//! opaque bytes, and reports storage conflicts as typed domain errors.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{RegistryError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::{RegistryService, RelationshipManager};
pub use validation::ValidationGate;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
