//! Organization and contact service implementation

use super::{observe, reject, validate, RelationshipManager};
use crate::models::{
    Attached, AttachmentChange, Contact, ContactDraft, ContactPayload, CreateOrganizationRequest,
    OrganizationWithContacts, UpdateContactRequest, UpdateOrganizationRequest,
};
use crate::utils::errors::Result;
use crate::utils::logging;
use crate::validation::{Mode, ValidationErrors, ValidationGate};

const ENTITY: &str = "Organization";
const CONTACT: &str = "Contact";

#[derive(Debug, Clone)]
pub struct OrganizationService {
    relationships: RelationshipManager,
}

/// Decode a contact payload and check every contact in it, collecting
/// violations into `errors` under `contacts[i].field`
fn decode_contacts(
    payload: Option<ContactPayload>,
    errors: &mut ValidationErrors,
) -> Option<Vec<ContactDraft>> {
    let drafts = match payload?.decode() {
        Ok(drafts) => drafts,
        Err(decode_errors) => {
            errors.extend(decode_errors);
            return None;
        }
    };

    check_contacts(&drafts, errors);
    Some(drafts)
}

fn check_contacts(drafts: &[ContactDraft], errors: &mut ValidationErrors) {
    let gate = ValidationGate::contact();
    for (index, draft) in drafts.iter().enumerate() {
        errors.extend_prefixed(
            &format!("{}[{}]", ContactPayload::FIELD, index),
            gate.evaluate(draft, Mode::Create),
        );
    }
}

impl OrganizationService {
    pub fn new(relationships: RelationshipManager) -> Self {
        Self { relationships }
    }

    /// Create an organization, its optional logo and its optional contact set
    pub async fn create(
        &self,
        request: CreateOrganizationRequest,
        logo: Option<Vec<u8>>,
    ) -> Result<OrganizationWithContacts> {
        let CreateOrganizationRequest { fields, contacts } = request;

        let mut errors = ValidationGate::organization().evaluate(&fields, Mode::Create);
        let contacts = decode_contacts(contacts, &mut errors);
        reject(ENTITY, "create", errors)?;

        let created = observe(
            ENTITY,
            "create",
            self.relationships
                .create_organization(Attached::new(fields, logo), contacts)
                .await,
        )?;

        logging::log_entity_write(ENTITY, "create", created.organization.id);
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<OrganizationWithContacts>> {
        observe(ENTITY, "list", self.relationships.list_organizations().await)
    }

    pub async fn get(&self, id: i64) -> Result<OrganizationWithContacts> {
        observe(ENTITY, "get", self.relationships.get_organization(id).await)
    }

    /// Update the supplied fields. A supplied contact set replaces the stored
    /// one entirely; `logo` decides whether the stored logo is kept, replaced
    /// or cleared.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateOrganizationRequest,
        logo: AttachmentChange,
    ) -> Result<OrganizationWithContacts> {
        let UpdateOrganizationRequest { changes, contacts } = request;

        let mut errors = ValidationGate::organization().evaluate(&changes, Mode::Update);
        let contacts = decode_contacts(contacts, &mut errors);
        reject(ENTITY, "update", errors)?;

        let updated = observe(
            ENTITY,
            "update",
            self.relationships
                .update_organization(id, Attached::change(changes, logo), contacts)
                .await,
        )?;

        logging::log_entity_write(ENTITY, "update", id);
        Ok(updated)
    }

    /// Replace an organization's contact set without touching its own fields
    pub async fn replace_contacts(
        &self,
        organization_id: i64,
        contacts: Vec<ContactDraft>,
    ) -> Result<OrganizationWithContacts> {
        let mut errors = ValidationErrors::new();
        check_contacts(&contacts, &mut errors);
        reject(ENTITY, "replace_contacts", errors)?;

        observe(
            ENTITY,
            "replace_contacts",
            self.relationships.replace_contacts(organization_id, contacts).await,
        )
    }

    /// Delete an organization and every contact it owns
    pub async fn delete(&self, id: i64) -> Result<()> {
        observe(ENTITY, "delete", self.relationships.delete_organization(id).await)?;
        logging::log_entity_write(ENTITY, "delete", id);
        Ok(())
    }

    pub async fn add_contact(&self, organization_id: i64, draft: ContactDraft) -> Result<Contact> {
        validate(CONTACT, "create", ValidationGate::contact(), &draft, Mode::Create)?;

        let contact = observe(CONTACT, "create", self.relationships.add_contact(organization_id, draft).await)?;
        logging::log_entity_write(CONTACT, "create", contact.id);
        Ok(contact)
    }

    pub async fn get_contact(&self, id: i64) -> Result<Contact> {
        observe(CONTACT, "get", self.relationships.get_contact(id).await)
    }

    /// Contacts of an organization; `NotFound` when there are none
    pub async fn contacts(&self, organization_id: i64) -> Result<Vec<Contact>> {
        observe(CONTACT, "list", self.relationships.contacts_for_organization(organization_id).await)
    }

    pub async fn update_contact(&self, id: i64, request: UpdateContactRequest) -> Result<Contact> {
        validate(CONTACT, "update", ValidationGate::contact(), &request, Mode::Update)?;

        let contact = observe(CONTACT, "update", self.relationships.update_contact(id, request).await)?;
        logging::log_entity_write(CONTACT, "update", id);
        Ok(contact)
    }

    pub async fn delete_contact(&self, id: i64) -> Result<()> {
        observe(CONTACT, "delete", self.relationships.delete_contact(id).await)?;
        logging::log_entity_write(CONTACT, "delete", id);
        Ok(())
    }
}
