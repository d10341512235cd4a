//! Utilities module
//!
//! Error types and logging shared by every layer

pub mod errors;
pub mod logging;

pub use errors::{RegistryError, Result, ErrorSeverity};
