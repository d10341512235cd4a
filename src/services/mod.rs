//! Services module
//!
//! Boundary-facing operations. Each one runs the validation gate first, then
//! folds in any attachment and hands off to a repository or to the
//! relationship manager.

pub mod department;
pub mod enrollee;
pub mod organization;
pub mod relationships;

// Re-export commonly used services
pub use department::DepartmentService;
pub use enrollee::EnrolleeService;
pub use organization::OrganizationService;
pub use relationships::RelationshipManager;

use crate::config::StoreConfig;
use crate::database::{health_check, DatabaseService, EntityStore, TableCounts};
use crate::utils::errors::{RegistryError, Result};
use crate::utils::logging;
use crate::validation::{FieldSource, Mode, ValidationErrors, ValidationGate};

/// Service factory wiring every service to one database handle
#[derive(Debug, Clone)]
pub struct RegistryService {
    pub enrollees: EnrolleeService,
    pub departments: DepartmentService,
    pub organizations: OrganizationService,
    database: DatabaseService,
}

impl RegistryService {
    pub fn new(database: DatabaseService, store: &StoreConfig) -> Self {
        let relationships = RelationshipManager::new(&database, store);

        Self {
            enrollees: EnrolleeService::new(database.enrollees.clone()),
            departments: DepartmentService::new(database.departments.clone(), relationships.clone()),
            organizations: OrganizationService::new(relationships),
            database,
        }
    }

    /// Check the store is reachable
    pub async fn health_check(&self) -> Result<()> {
        health_check(&self.database.pool).await
    }

    /// Row count per table
    pub async fn table_counts(&self) -> Result<TableCounts> {
        self.database.table_counts().await
    }
}

/// Run a rule table and log rejections
pub(crate) fn validate(
    entity: &str,
    operation: &str,
    gate: ValidationGate,
    source: &impl FieldSource,
    mode: Mode,
) -> Result<()> {
    reject(entity, operation, gate.evaluate(source, mode))
}

/// Fail with every collected violation, if there are any
pub(crate) fn reject(entity: &str, operation: &str, errors: ValidationErrors) -> Result<()> {
    errors.into_result().map_err(|errors| {
        logging::log_validation_failure(entity, operation, errors.len());
        RegistryError::from(errors)
    })
}

/// Log storage failures that were not classified as client errors
pub(crate) fn observe<T>(entity: &str, operation: &str, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        if !error.is_client_error() {
            logging::log_storage_failure(entity, operation, error);
        }
    }
    result
}

/// Delete through any entity store
pub(crate) async fn delete_entity<S>(store: &S, id: i64) -> Result<()>
where
    S: EntityStore + Sync,
{
    observe(S::ENTITY, "delete", store.delete(id).await)?;
    logging::log_entity_write(S::ENTITY, "delete", id);
    Ok(())
}
