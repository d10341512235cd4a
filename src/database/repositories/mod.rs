//! Database repositories module
//!
//! One repository per table. Each implements [`EntityStore`] for the plain
//! create/read/update/delete contract and additionally exposes
//! connection-level helpers so multi-table writes can share a transaction.

pub mod contact;
pub mod department;
pub mod enrollee;
pub mod organization;

use std::future::Future;

use crate::utils::errors::Result;

// Re-export repositories
pub use contact::ContactRepository;
pub use department::DepartmentRepository;
pub use enrollee::EnrolleeRepository;
pub use organization::OrganizationRepository;

/// Create/read/update/delete against a single entity table.
///
/// `update` reports `NotFound` before attempting the write, `delete` reports
/// it when no row was affected. Uniqueness violations surface as
/// `RegistryError::Conflict`.
pub trait EntityStore {
    type Entity;
    type Create;
    type Update;

    /// Entity name used in `NotFound` errors and logs
    const ENTITY: &'static str;

    fn create(&self, request: Self::Create) -> impl Future<Output = Result<Self::Entity>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Self::Entity>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<Self::Entity>>> + Send;

    fn update(&self, id: i64, request: Self::Update) -> impl Future<Output = Result<Self::Entity>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}
