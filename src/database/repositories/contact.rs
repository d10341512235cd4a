//! Contact repository implementation

use sqlx::{PgConnection, PgPool};

use super::EntityStore;
use crate::database::conflict;
use crate::models::contact::{Contact, ContactDraft, NewContact, UpdateContactRequest};
use crate::utils::errors::{RegistryError, Result};

#[derive(Clone, Debug)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find contact by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            "SELECT id, organization_id, role, name, email, phone FROM contacts WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Insert a contact owned by `organization_id`; any draft id is ignored
    pub async fn insert_in(
        conn: &mut PgConnection,
        organization_id: i64,
        draft: &ContactDraft,
    ) -> Result<Contact> {
        sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (organization_id, role, name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, role, name, email, phone
            "#
        )
        .bind(organization_id)
        .bind(&draft.role)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .fetch_one(&mut *conn)
        .await
        .map_err(conflict::translate)
    }

    /// Get an organization's contacts on an existing connection
    pub async fn list_for_organization_in(
        conn: &mut PgConnection,
        organization_id: i64,
    ) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, organization_id, role, name, email, phone FROM contacts WHERE organization_id = $1 ORDER BY id ASC"
        )
        .bind(organization_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(contacts)
    }

    /// Remove every contact of an organization, returning how many went
    pub async fn delete_for_organization_in(
        conn: &mut PgConnection,
        organization_id: i64,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM contacts WHERE organization_id = $1")
            .bind(organization_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Get an organization's contacts
    pub async fn list_for_organization(&self, organization_id: i64) -> Result<Vec<Contact>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_for_organization_in(&mut conn, organization_id).await
    }

    /// Get the contacts of several organizations at once
    pub async fn list_for_organizations(&self, organization_ids: &[i64]) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, organization_id, role, name, email, phone FROM contacts WHERE organization_id = ANY($1) ORDER BY organization_id ASC, id ASC"
        )
        .bind(organization_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }

    /// Count total contacts
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

impl EntityStore for ContactRepository {
    type Entity = Contact;
    type Create = NewContact;
    type Update = UpdateContactRequest;

    const ENTITY: &'static str = "Contact";

    async fn create(&self, request: NewContact) -> Result<Contact> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, request.organization_id, &request.draft).await
    }

    async fn get(&self, id: i64) -> Result<Contact> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, organization_id, role, name, email, phone FROM contacts ORDER BY id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }

    async fn update(&self, id: i64, request: UpdateContactRequest) -> Result<Contact> {
        self.get(id).await?;
        let (keep_phone, phone) = request.phone.into_binds();

        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET role = COALESCE($2, role),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = CASE WHEN $5 THEN phone ELSE $6 END
            WHERE id = $1
            RETURNING id, organization_id, role, name, email, phone
            "#
        )
        .bind(id)
        .bind(request.role)
        .bind(request.name)
        .bind(request.email)
        .bind(keep_phone)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict::translate)?
        .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(Self::ENTITY, id));
        }

        Ok(())
    }
}
