//! Department repository implementation

use sqlx::PgPool;

use super::EntityStore;
use crate::database::conflict;
use crate::models::department::{CreateDepartmentRequest, Department, UpdateDepartmentRequest};
use crate::utils::errors::{RegistryError, Result};

#[derive(Clone, Debug)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find department by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Department>> {
        let department = sqlx::query_as::<_, Department>(
            "SELECT id, department_name, course_name FROM departments WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(department)
    }

    /// Count total departments
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

impl EntityStore for DepartmentRepository {
    type Entity = Department;
    type Create = CreateDepartmentRequest;
    type Update = UpdateDepartmentRequest;

    const ENTITY: &'static str = "Department";

    async fn create(&self, request: CreateDepartmentRequest) -> Result<Department> {
        sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (department_name, course_name)
            VALUES ($1, $2)
            RETURNING id, department_name, course_name
            "#
        )
        .bind(request.department_name)
        .bind(request.course_name)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict::translate)
    }

    async fn get(&self, id: i64) -> Result<Department> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    async fn list(&self) -> Result<Vec<Department>> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT id, department_name, course_name FROM departments ORDER BY id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }

    async fn update(&self, id: i64, request: UpdateDepartmentRequest) -> Result<Department> {
        self.get(id).await?;

        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET department_name = COALESCE($2, department_name),
                course_name = COALESCE($3, course_name)
            WHERE id = $1
            RETURNING id, department_name, course_name
            "#
        )
        .bind(id)
        .bind(request.department_name)
        .bind(request.course_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict::translate)?
        .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    /// Delete department. Enrollees referencing it are left untouched.
    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(Self::ENTITY, id));
        }

        Ok(())
    }
}
