//! Database service layer
//!
//! Groups the per-table repositories over one shared pool.

use serde::Serialize;

use crate::database::{ContactRepository, DatabasePool, DepartmentRepository, EnrolleeRepository, OrganizationRepository};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub pool: DatabasePool,
    pub enrollees: EnrolleeRepository,
    pub departments: DepartmentRepository,
    pub organizations: OrganizationRepository,
    pub contacts: ContactRepository,
}

/// Row count per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub enrollees: i64,
    pub departments: i64,
    pub organizations: i64,
    pub contacts: i64,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            enrollees: EnrolleeRepository::new(pool.clone()),
            departments: DepartmentRepository::new(pool.clone()),
            organizations: OrganizationRepository::new(pool.clone()),
            contacts: ContactRepository::new(pool.clone()),
            pool,
        }
    }

    /// Count the rows of every table
    pub async fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            enrollees: self.enrollees.count().await?,
            departments: self.departments.count().await?,
            organizations: self.organizations.count().await?,
            contacts: self.contacts.count().await?,
        })
    }
}
