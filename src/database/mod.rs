//! Database module
//!
//! This module handles database connections, per-table repositories and the
//! translation of storage conflicts into domain errors

pub mod conflict;
pub mod connection;
pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check, begin_with_isolation};
pub use repositories::{EntityStore, EnrolleeRepository, DepartmentRepository, OrganizationRepository, ContactRepository};
pub use service::{DatabaseService, TableCounts};
