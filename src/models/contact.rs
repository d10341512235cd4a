//! Organization contact model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::change::Change;
use crate::validation::{FieldSource, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub organization_id: i64,
    pub role: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Contact fields as submitted, before an owning organization is known.
///
/// Any `id` in the payload is accepted and discarded: contact identity is
/// never carried across a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    pub role: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A contact tagged with the organization that owns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub organization_id: i64,
    #[serde(flatten)]
    pub draft: ContactDraft,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    pub role: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// An explicit `null` clears the stored phone
    #[serde(default, skip_serializing_if = "Change::is_keep")]
    pub phone: Change<String>,
}

/// A contact set as it arrives from the boundary.
///
/// Multipart submissions can only carry flat fields, so the set usually
/// arrives as one JSON-encoded string field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactPayload {
    Decoded(Vec<ContactDraft>),
    Encoded(String),
}

impl ContactPayload {
    pub const FIELD: &'static str = "contacts";

    /// Decode into an ordered contact set
    pub fn decode(self) -> Result<Vec<ContactDraft>, ValidationErrors> {
        match self {
            ContactPayload::Decoded(contacts) => Ok(contacts),
            ContactPayload::Encoded(raw) => serde_json::from_str::<Vec<ContactDraft>>(&raw)
                .map_err(|e| {
                    ValidationErrors::single(
                        Self::FIELD,
                        format!("contacts must be a JSON array of contacts: {}", e),
                    )
                }),
        }
    }
}

impl From<Vec<ContactDraft>> for ContactPayload {
    fn from(contacts: Vec<ContactDraft>) -> Self {
        ContactPayload::Decoded(contacts)
    }
}

impl FieldSource for ContactDraft {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "role" => Some(&self.role),
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "phone" => self.phone.as_deref(),
            _ => None,
        }
    }
}

impl FieldSource for UpdateContactRequest {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "role" => self.role.as_deref(),
            "name" => self.name.as_deref(),
            "email" => self.email.as_deref(),
            "phone" => self.phone.as_set().map(String::as_str),
            _ => None,
        }
    }
}
