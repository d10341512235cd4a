//! Organization repository implementation
//!
//! Works on the parent row only. Contact sets are written through
//! [`ContactRepository`](super::ContactRepository) inside the same
//! transaction by the relationship layer.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use super::EntityStore;
use crate::database::conflict;
use crate::models::attachment::{self, Attached, AttachmentChange};
use crate::models::organization::{Organization, OrganizationChanges, OrganizationFields};
use crate::utils::errors::{RegistryError, Result};

const COLUMNS: &str =
    "id, name, address_line1, address_line2, city, state, zip_code, logo, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find organization by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Organization>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    /// Find organization by ID on an existing connection
    pub async fn find_in(conn: &mut PgConnection, id: i64) -> Result<Option<Organization>> {
        let sql = format!("SELECT {} FROM organizations WHERE id = $1", COLUMNS);
        let organization = sqlx::query_as::<_, Organization>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(organization)
    }

    /// Find and row-lock an organization for the rest of the transaction
    pub async fn lock_in(conn: &mut PgConnection, id: i64) -> Result<Option<Organization>> {
        let sql = format!("SELECT {} FROM organizations WHERE id = $1 FOR UPDATE", COLUMNS);
        let organization = sqlx::query_as::<_, Organization>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(organization)
    }

    /// Insert the parent row and return it with its generated id
    pub async fn insert_in(
        conn: &mut PgConnection,
        request: Attached<OrganizationFields>,
    ) -> Result<Organization> {
        let Attached { fields, attachment: logo } = request;
        let now = Utc::now();

        let sql = format!(
            r#"
            INSERT INTO organizations (name, address_line1, address_line2, city, state, zip_code, logo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Organization>(&sql)
            .bind(fields.name)
            .bind(fields.address_line1)
            .bind(fields.address_line2)
            .bind(fields.city)
            .bind(fields.state)
            .bind(fields.zip_code)
            .bind(logo)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *conn)
            .await
            .map_err(conflict::translate)
    }

    /// Update the parent row. `None` when the row does not exist.
    pub async fn update_in(
        conn: &mut PgConnection,
        id: i64,
        request: Attached<OrganizationChanges, AttachmentChange>,
    ) -> Result<Option<Organization>> {
        let Attached { fields, attachment: logo } = request;
        let (keep_logo, logo) = attachment::update_binds(logo);
        let (keep_line2, address_line2) = fields.address_line2.into_binds();

        let sql = format!(
            r#"
            UPDATE organizations
            SET name = COALESCE($2, name),
                address_line1 = COALESCE($3, address_line1),
                address_line2 = CASE WHEN $4 THEN address_line2 ELSE $5 END,
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                zip_code = COALESCE($8, zip_code),
                logo = CASE WHEN $9 THEN logo ELSE $10 END,
                updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Organization>(&sql)
            .bind(id)
            .bind(fields.name)
            .bind(fields.address_line1)
            .bind(keep_line2)
            .bind(address_line2)
            .bind(fields.city)
            .bind(fields.state)
            .bind(fields.zip_code)
            .bind(keep_logo)
            .bind(logo)
            .bind(Utc::now())
            .fetch_optional(&mut *conn)
            .await
            .map_err(conflict::translate)
    }

    /// Count total organizations
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM organizations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

impl EntityStore for OrganizationRepository {
    type Entity = Organization;
    type Create = Attached<OrganizationFields>;
    type Update = Attached<OrganizationChanges, AttachmentChange>;

    const ENTITY: &'static str = "Organization";

    async fn create(&self, request: Attached<OrganizationFields>) -> Result<Organization> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, request).await
    }

    async fn get(&self, id: i64) -> Result<Organization> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    async fn list(&self) -> Result<Vec<Organization>> {
        let sql = format!("SELECT {} FROM organizations ORDER BY id ASC", COLUMNS);
        let organizations = sqlx::query_as::<_, Organization>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(organizations)
    }

    async fn update(
        &self,
        id: i64,
        request: Attached<OrganizationChanges, AttachmentChange>,
    ) -> Result<Organization> {
        let mut conn = self.pool.acquire().await?;
        if Self::find_in(&mut conn, id).await?.is_none() {
            return Err(RegistryError::not_found(Self::ENTITY, id));
        }

        Self::update_in(&mut conn, id, request)
            .await?
            .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    /// Delete organization. Its contacts go with it.
    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(Self::ENTITY, id));
        }

        Ok(())
    }
}
