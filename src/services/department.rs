//! Department service implementation

use super::{delete_entity, observe, validate, RelationshipManager};
use crate::database::{DepartmentRepository, EntityStore};
use crate::models::{CreateDepartmentRequest, Department, DepartmentWithEnrollees, Enrollee, UpdateDepartmentRequest};
use crate::utils::errors::Result;
use crate::utils::logging;
use crate::validation::{Mode, ValidationGate};

const ENTITY: &str = DepartmentRepository::ENTITY;

#[derive(Debug, Clone)]
pub struct DepartmentService {
    repository: DepartmentRepository,
    relationships: RelationshipManager,
}

impl DepartmentService {
    pub fn new(repository: DepartmentRepository, relationships: RelationshipManager) -> Self {
        Self { repository, relationships }
    }

    pub async fn create(&self, request: CreateDepartmentRequest) -> Result<Department> {
        validate(ENTITY, "create", ValidationGate::department(), &request, Mode::Create)?;

        let department = observe(ENTITY, "create", self.repository.create(request).await)?;
        logging::log_entity_write(ENTITY, "create", department.id);
        Ok(department)
    }

    pub async fn list(&self) -> Result<Vec<Department>> {
        observe(ENTITY, "list", self.repository.list().await)
    }

    pub async fn get(&self, id: i64) -> Result<Department> {
        observe(ENTITY, "get", self.repository.get(id).await)
    }

    pub async fn update(&self, id: i64, request: UpdateDepartmentRequest) -> Result<Department> {
        validate(ENTITY, "update", ValidationGate::department(), &request, Mode::Update)?;

        let department = observe(ENTITY, "update", self.repository.update(id, request).await)?;
        logging::log_entity_write(ENTITY, "update", id);
        Ok(department)
    }

    /// Delete a department. Enrollees keep their (now dangling) reference.
    pub async fn delete(&self, id: i64) -> Result<()> {
        delete_entity(&self.repository, id).await
    }

    pub async fn get_with_enrollees(&self, id: i64) -> Result<DepartmentWithEnrollees> {
        observe(ENTITY, "get", self.relationships.department_with_enrollees(id).await)
    }

    /// Enrollees referencing `department_id`, even if the department is gone
    pub async fn enrollees(&self, department_id: i64) -> Result<Vec<Enrollee>> {
        observe(ENTITY, "list_enrollees", self.relationships.enrollees_in_department(department_id).await)
    }

    /// Enrollees whose department has been deleted
    pub async fn dangling_enrollees(&self) -> Result<Vec<Enrollee>> {
        observe(ENTITY, "list_dangling", self.relationships.enrollees_with_missing_department().await)
    }
}
