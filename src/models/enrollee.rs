//! Enrollee model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use super::change::Change;
use crate::validation::FieldSource;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollee {
    pub id: i64,
    pub name: String,
    pub roll_code: String,
    pub email: String,
    pub phone: String,
    pub category: String,
    pub photo: Option<Vec<u8>>,
    /// May point at a department that has since been deleted
    pub department_id: Option<i64>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub permanent_address: Option<String>,
    pub current_address: Option<String>,
    pub degree: Option<String>,
    pub program_name: Option<String>,
    pub technical_skills: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEnrolleeRequest {
    pub name: String,
    pub roll_code: String,
    pub email: String,
    pub phone: String,
    pub category: String,
    pub department_id: Option<i64>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub permanent_address: Option<String>,
    pub current_address: Option<String>,
    pub degree: Option<String>,
    pub program_name: Option<String>,
    pub technical_skills: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
}

/// Partial enrollee update. Required columns are `Option` (absent keeps the
/// stored value); nullable columns are [`Change`] so an explicit `null`
/// clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEnrolleeRequest {
    pub name: Option<String>,
    pub roll_code: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub department: Change<i64>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub date_of_birth: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub gender: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub permanent_address: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub current_address: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub degree: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub program_name: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub technical_skills: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub project_name: Change<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub project_description: Change<String>,
}

impl FieldSource for CreateEnrolleeRequest {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "roll_code" => Some(&self.roll_code),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "category" => Some(&self.category),
            "date_of_birth" => self.date_of_birth.as_deref(),
            "gender" => self.gender.as_deref(),
            "degree" => self.degree.as_deref(),
            "program_name" => self.program_name.as_deref(),
            "project_name" => self.project_name.as_deref(),
            _ => None,
        }
    }
}

impl FieldSource for UpdateEnrolleeRequest {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "roll_code" => self.roll_code.as_deref(),
            "email" => self.email.as_deref(),
            "phone" => self.phone.as_deref(),
            "category" => self.category.as_deref(),
            "date_of_birth" => self.date_of_birth.as_set().map(String::as_str),
            "gender" => self.gender.as_set().map(String::as_str),
            "degree" => self.degree.as_set().map(String::as_str),
            "program_name" => self.program_name.as_set().map(String::as_str),
            "project_name" => self.project_name.as_set().map(String::as_str),
            _ => None,
        }
    }
}
