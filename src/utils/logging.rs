//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the registry.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::errors::{RegistryError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, &config.file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().with_ansi(false).with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = config.json.then(|| fmt::layer().json().with_writer(std::io::stdout));
    let text_layer = (!config.json).then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.level))
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| RegistryError::Config(format!("failed to install logger: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a successful entity write
pub fn log_entity_write(entity: &str, operation: &str, id: i64) {
    info!(
        entity = entity,
        operation = operation,
        id = id,
        "Entity write completed"
    );
}

/// Log a uniqueness conflict
pub fn log_conflict(table: &str, field: &str) {
    warn!(
        table = table,
        field = field,
        "Uniqueness conflict"
    );
}

/// Log a storage failure that could not be classified
pub fn log_storage_failure(entity: &str, operation: &str, error: &RegistryError) {
    error!(
        entity = entity,
        operation = operation,
        error = %error,
        severity = %error.severity(),
        "Storage operation failed"
    );
}

/// Log a rejected submission
pub fn log_validation_failure(entity: &str, operation: &str, fields: usize) {
    debug!(
        entity = entity,
        operation = operation,
        invalid_fields = fields,
        "Submission rejected by validation"
    );
}

/// Log an owned contact set being replaced
pub fn log_contact_replacement(organization_id: i64, removed: usize, inserted: usize) {
    info!(
        organization_id = organization_id,
        removed = removed,
        inserted = inserted,
        "Contact set replaced"
    );
}
