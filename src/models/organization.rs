//! Organization model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::change::Change;
use super::contact::{Contact, ContactPayload};
use crate::validation::FieldSource;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub logo: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An organization together with its owned contact set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationWithContacts {
    #[serde(flatten)]
    pub organization: Organization,
    pub contacts: Vec<Contact>,
}

/// Flat organization columns for an insert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationFields {
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Flat organization columns for an update; `None` leaves a column alone.
/// `address_line2` is nullable, so an explicit `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub address_line2: Change<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    #[serde(flatten)]
    pub fields: OrganizationFields,
    #[serde(default)]
    pub contacts: Option<ContactPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganizationRequest {
    #[serde(flatten)]
    pub changes: OrganizationChanges,
    /// When present, replaces the whole contact set
    #[serde(default)]
    pub contacts: Option<ContactPayload>,
}

impl FieldSource for OrganizationFields {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "address_line1" => Some(&self.address_line1),
            "address_line2" => self.address_line2.as_deref(),
            "city" => Some(&self.city),
            "state" => Some(&self.state),
            "zip_code" => Some(&self.zip_code),
            _ => None,
        }
    }
}

impl FieldSource for OrganizationChanges {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "address_line1" => self.address_line1.as_deref(),
            "address_line2" => self.address_line2.as_set().map(String::as_str),
            "city" => self.city.as_deref(),
            "state" => self.state.as_deref(),
            "zip_code" => self.zip_code.as_deref(),
            _ => None,
        }
    }
}
