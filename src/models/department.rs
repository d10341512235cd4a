//! Department model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enrollee::Enrollee;
use crate::validation::FieldSource;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub id: i64,
    pub department_name: String,
    pub course_name: String,
}

/// A department with the enrollees currently referencing it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentWithEnrollees {
    #[serde(flatten)]
    pub department: Department,
    pub enrollees: Vec<Enrollee>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartmentRequest {
    pub department_name: String,
    pub course_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub department_name: Option<String>,
    pub course_name: Option<String>,
}

impl FieldSource for CreateDepartmentRequest {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "department_name" => Some(&self.department_name),
            "course_name" => Some(&self.course_name),
            _ => None,
        }
    }
}

impl FieldSource for UpdateDepartmentRequest {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "department_name" => self.department_name.as_deref(),
            "course_name" => self.course_name.as_deref(),
            _ => None,
        }
    }
}
