//! Parent/child coordination
//!
//! Organization writes and their owned contact sets commit or roll back as
//! one transaction. A supplied contact set always replaces the stored one:
//! every existing row is deleted and every supplied contact inserted with a
//! fresh id, so contact identity never survives an update.
//!
//! Department/enrollee links are looked up here for read paths only.
//! Deleting a department never touches the enrollees that reference it.

use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::{debug, instrument};

use crate::config::{IsolationLevel, StoreConfig};
use crate::database::{
    begin_with_isolation, ContactRepository, DatabasePool, DatabaseService, DepartmentRepository,
    EnrolleeRepository, EntityStore, OrganizationRepository,
};
use crate::models::{
    Attached, AttachmentChange, Contact, ContactDraft, DepartmentWithEnrollees, Enrollee, NewContact,
    OrganizationChanges, OrganizationFields, OrganizationWithContacts, UpdateContactRequest,
};
use crate::utils::errors::{RegistryError, Result};
use crate::utils::logging;

/// Entity name reported when an organization has no contacts to return
pub const ORGANIZATION_CONTACTS: &str = "Contacts of organization";

#[derive(Debug, Clone)]
pub struct RelationshipManager {
    pool: DatabasePool,
    organizations: OrganizationRepository,
    contacts: ContactRepository,
    departments: DepartmentRepository,
    enrollees: EnrolleeRepository,
    replace_isolation: IsolationLevel,
}

impl RelationshipManager {
    pub fn new(database: &DatabaseService, store: &StoreConfig) -> Self {
        Self {
            pool: database.pool.clone(),
            organizations: database.organizations.clone(),
            contacts: database.contacts.clone(),
            departments: database.departments.clone(),
            enrollees: database.enrollees.clone(),
            replace_isolation: store.replace_isolation,
        }
    }

    /// Insert an organization, then its contacts tagged with the new id
    #[instrument(skip_all)]
    pub async fn create_organization(
        &self,
        organization: Attached<OrganizationFields>,
        contacts: Option<Vec<ContactDraft>>,
    ) -> Result<OrganizationWithContacts> {
        let mut tx = begin_with_isolation(&self.pool, self.replace_isolation).await?;

        let organization = OrganizationRepository::insert_in(&mut tx, organization).await?;

        let mut inserted = Vec::new();
        for draft in contacts.iter().flatten() {
            inserted.push(ContactRepository::insert_in(&mut tx, organization.id, draft).await?);
        }

        tx.commit().await?;

        debug!(organization_id = organization.id, contacts = inserted.len(), "Organization created");
        Ok(OrganizationWithContacts {
            organization,
            contacts: inserted,
        })
    }

    /// Update an organization's own fields and, when supplied, replace its contact set
    #[instrument(skip(self, changes, contacts))]
    pub async fn update_organization(
        &self,
        id: i64,
        changes: Attached<OrganizationChanges, AttachmentChange>,
        contacts: Option<Vec<ContactDraft>>,
    ) -> Result<OrganizationWithContacts> {
        let mut tx = begin_with_isolation(&self.pool, self.replace_isolation).await?;

        if OrganizationRepository::lock_in(&mut tx, id).await?.is_none() {
            return Err(RegistryError::not_found(OrganizationRepository::ENTITY, id));
        }

        let organization = OrganizationRepository::update_in(&mut tx, id, changes)
            .await?
            .ok_or_else(|| RegistryError::not_found(OrganizationRepository::ENTITY, id))?;

        let contacts = match contacts {
            Some(drafts) => replace_contacts_in(&mut tx, id, &drafts).await?,
            None => ContactRepository::list_for_organization_in(&mut tx, id).await?,
        };

        tx.commit().await?;

        Ok(OrganizationWithContacts { organization, contacts })
    }

    /// Replace an organization's whole contact set
    #[instrument(skip(self, contacts))]
    pub async fn replace_contacts(
        &self,
        organization_id: i64,
        contacts: Vec<ContactDraft>,
    ) -> Result<OrganizationWithContacts> {
        let mut tx = begin_with_isolation(&self.pool, self.replace_isolation).await?;

        let organization = OrganizationRepository::lock_in(&mut tx, organization_id)
            .await?
            .ok_or_else(|| RegistryError::not_found(OrganizationRepository::ENTITY, organization_id))?;

        let contacts = replace_contacts_in(&mut tx, organization_id, &contacts).await?;

        tx.commit().await?;

        Ok(OrganizationWithContacts { organization, contacts })
    }

    /// Get an organization with its contacts
    pub async fn get_organization(&self, id: i64) -> Result<OrganizationWithContacts> {
        let organization = self.organizations.get(id).await?;
        let contacts = self.contacts.list_for_organization(id).await?;

        Ok(OrganizationWithContacts { organization, contacts })
    }

    /// Get every organization with its contacts
    pub async fn list_organizations(&self) -> Result<Vec<OrganizationWithContacts>> {
        let organizations = self.organizations.list().await?;
        let ids: Vec<i64> = organizations.iter().map(|o| o.id).collect();

        let mut by_owner: HashMap<i64, Vec<Contact>> = HashMap::new();
        for contact in self.contacts.list_for_organizations(&ids).await? {
            by_owner.entry(contact.organization_id).or_default().push(contact);
        }

        Ok(organizations
            .into_iter()
            .map(|organization| OrganizationWithContacts {
                contacts: by_owner.remove(&organization.id).unwrap_or_default(),
                organization,
            })
            .collect())
    }

    /// Delete an organization together with its contacts
    pub async fn delete_organization(&self, id: i64) -> Result<()> {
        self.organizations.delete(id).await
    }

    /// Add one contact to an existing organization
    pub async fn add_contact(&self, organization_id: i64, draft: ContactDraft) -> Result<Contact> {
        if self.organizations.find_by_id(organization_id).await?.is_none() {
            return Err(RegistryError::not_found(OrganizationRepository::ENTITY, organization_id));
        }

        self.contacts
            .create(NewContact { organization_id, draft })
            .await
    }

    pub async fn get_contact(&self, id: i64) -> Result<Contact> {
        self.contacts.get(id).await
    }

    /// Get an organization's contacts.
    ///
    /// An empty set is reported as `NotFound`, the same as a missing
    /// organization; callers cannot tell the two apart from the error.
    pub async fn contacts_for_organization(&self, organization_id: i64) -> Result<Vec<Contact>> {
        let contacts = self.contacts.list_for_organization(organization_id).await?;
        if contacts.is_empty() {
            return Err(RegistryError::not_found(ORGANIZATION_CONTACTS, organization_id));
        }

        Ok(contacts)
    }

    pub async fn update_contact(&self, id: i64, request: UpdateContactRequest) -> Result<Contact> {
        self.contacts.update(id, request).await
    }

    pub async fn delete_contact(&self, id: i64) -> Result<()> {
        self.contacts.delete(id).await
    }

    /// Get a department with the enrollees that reference it
    pub async fn department_with_enrollees(&self, id: i64) -> Result<DepartmentWithEnrollees> {
        let department = self.departments.get(id).await?;
        let enrollees = self.enrollees.list_by_department(id).await?;

        Ok(DepartmentWithEnrollees { department, enrollees })
    }

    /// Get enrollees referencing a department id, including a deleted one
    pub async fn enrollees_in_department(&self, department_id: i64) -> Result<Vec<Enrollee>> {
        self.enrollees.list_by_department(department_id).await
    }

    /// Get enrollees left pointing at a deleted department
    pub async fn enrollees_with_missing_department(&self) -> Result<Vec<Enrollee>> {
        self.enrollees.list_with_missing_department().await
    }
}

/// Load, delete and re-insert an organization's contacts on the caller's transaction
async fn replace_contacts_in(
    conn: &mut PgConnection,
    organization_id: i64,
    drafts: &[ContactDraft],
) -> Result<Vec<Contact>> {
    let previous = ContactRepository::list_for_organization_in(conn, organization_id).await?;
    let removed = ContactRepository::delete_for_organization_in(conn, organization_id).await?;
    debug!(organization_id, previous = previous.len(), removed, "Existing contacts removed");

    let mut inserted = Vec::with_capacity(drafts.len());
    for draft in drafts {
        inserted.push(ContactRepository::insert_in(conn, organization_id, draft).await?);
    }

    logging::log_contact_replacement(organization_id, removed as usize, inserted.len());
    Ok(inserted)
}
