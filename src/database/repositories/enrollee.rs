//! Enrollee repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use super::EntityStore;
use crate::database::conflict;
use crate::models::attachment::{self, Attached, AttachmentChange};
use crate::models::enrollee::{CreateEnrolleeRequest, Enrollee, UpdateEnrolleeRequest};
use crate::utils::errors::{RegistryError, Result};
use crate::validation::{rules, ValidationErrors};

const COLUMNS: &str = "id, name, roll_code, email, phone, category, photo, department_id, \
    date_of_birth, gender, permanent_address, current_address, degree, program_name, \
    technical_skills, project_name, project_description, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct EnrolleeRepository {
    pool: PgPool,
}

fn birth_date(raw: &str) -> Result<NaiveDate> {
    rules::parse_birth_date(raw).ok_or_else(|| {
        ValidationErrors::single("date_of_birth", "invalid date format, use YYYY-MM-DD").into()
    })
}

impl EnrolleeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find enrollee by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Enrollee>> {
        let sql = format!("SELECT {} FROM enrollees WHERE id = $1", COLUMNS);
        let enrollee = sqlx::query_as::<_, Enrollee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(enrollee)
    }

    /// Get enrollees referencing a department, whether or not it still exists
    pub async fn list_by_department(&self, department_id: i64) -> Result<Vec<Enrollee>> {
        let sql = format!(
            "SELECT {} FROM enrollees WHERE department_id = $1 ORDER BY id ASC",
            COLUMNS
        );
        let enrollees = sqlx::query_as::<_, Enrollee>(&sql)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(enrollees)
    }

    /// Get enrollees whose department reference points at a deleted department
    pub async fn list_with_missing_department(&self) -> Result<Vec<Enrollee>> {
        let sql = format!(
            r#"
            SELECT {} FROM enrollees e
            WHERE e.department_id IS NOT NULL
              AND NOT EXISTS (SELECT 1 FROM departments d WHERE d.id = e.department_id)
            ORDER BY e.id ASC
            "#,
            COLUMNS
        );
        let enrollees = sqlx::query_as::<_, Enrollee>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(enrollees)
    }

    /// Count total enrollees
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollees")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

impl EntityStore for EnrolleeRepository {
    type Entity = Enrollee;
    type Create = Attached<CreateEnrolleeRequest>;
    type Update = Attached<UpdateEnrolleeRequest, AttachmentChange>;

    const ENTITY: &'static str = "Enrollee";

    async fn create(&self, request: Attached<CreateEnrolleeRequest>) -> Result<Enrollee> {
        let Attached { fields, attachment: photo } = request;
        let date_of_birth = fields.date_of_birth.as_deref().map(birth_date).transpose()?;
        let now = Utc::now();

        let sql = format!(
            r#"
            INSERT INTO enrollees (name, roll_code, email, phone, category, photo, department_id,
                date_of_birth, gender, permanent_address, current_address, degree, program_name,
                technical_skills, project_name, project_description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Enrollee>(&sql)
            .bind(fields.name)
            .bind(fields.roll_code)
            .bind(fields.email)
            .bind(fields.phone)
            .bind(fields.category)
            .bind(photo)
            .bind(fields.department_id)
            .bind(date_of_birth)
            .bind(fields.gender)
            .bind(fields.permanent_address)
            .bind(fields.current_address)
            .bind(fields.degree)
            .bind(fields.program_name)
            .bind(fields.technical_skills)
            .bind(fields.project_name)
            .bind(fields.project_description)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(conflict::translate)
    }

    async fn get(&self, id: i64) -> Result<Enrollee> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    async fn list(&self) -> Result<Vec<Enrollee>> {
        let sql = format!("SELECT {} FROM enrollees ORDER BY id ASC", COLUMNS);
        let enrollees = sqlx::query_as::<_, Enrollee>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(enrollees)
    }

    async fn update(
        &self,
        id: i64,
        request: Attached<UpdateEnrolleeRequest, AttachmentChange>,
    ) -> Result<Enrollee> {
        self.get(id).await?;

        let Attached { fields, attachment: photo } = request;
        let (keep_photo, photo) = attachment::update_binds(photo);
        let (keep_department, department_id) = fields.department.into_binds();
        let (keep_birth, date_of_birth) = fields.date_of_birth.try_map(|raw| birth_date(&raw))?.into_binds();
        let (keep_gender, gender) = fields.gender.into_binds();
        let (keep_permanent, permanent_address) = fields.permanent_address.into_binds();
        let (keep_current, current_address) = fields.current_address.into_binds();
        let (keep_degree, degree) = fields.degree.into_binds();
        let (keep_program, program_name) = fields.program_name.into_binds();
        let (keep_skills, technical_skills) = fields.technical_skills.into_binds();
        let (keep_project, project_name) = fields.project_name.into_binds();
        let (keep_description, project_description) = fields.project_description.into_binds();

        let sql = format!(
            r#"
            UPDATE enrollees
            SET name = COALESCE($2, name),
                roll_code = COALESCE($3, roll_code),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                category = COALESCE($6, category),
                photo = CASE WHEN $7 THEN photo ELSE $8 END,
                department_id = CASE WHEN $9 THEN department_id ELSE $10 END,
                date_of_birth = CASE WHEN $11 THEN date_of_birth ELSE $12 END,
                gender = CASE WHEN $13 THEN gender ELSE $14 END,
                permanent_address = CASE WHEN $15 THEN permanent_address ELSE $16 END,
                current_address = CASE WHEN $17 THEN current_address ELSE $18 END,
                degree = CASE WHEN $19 THEN degree ELSE $20 END,
                program_name = CASE WHEN $21 THEN program_name ELSE $22 END,
                technical_skills = CASE WHEN $23 THEN technical_skills ELSE $24 END,
                project_name = CASE WHEN $25 THEN project_name ELSE $26 END,
                project_description = CASE WHEN $27 THEN project_description ELSE $28 END,
                updated_at = $29
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Enrollee>(&sql)
            .bind(id)
            .bind(fields.name)
            .bind(fields.roll_code)
            .bind(fields.email)
            .bind(fields.phone)
            .bind(fields.category)
            .bind(keep_photo)
            .bind(photo)
            .bind(keep_department)
            .bind(department_id)
            .bind(keep_birth)
            .bind(date_of_birth)
            .bind(keep_gender)
            .bind(gender)
            .bind(keep_permanent)
            .bind(permanent_address)
            .bind(keep_current)
            .bind(current_address)
            .bind(keep_degree)
            .bind(degree)
            .bind(keep_program)
            .bind(program_name)
            .bind(keep_skills)
            .bind(technical_skills)
            .bind(keep_project)
            .bind(project_name)
            .bind(keep_description)
            .bind(project_description)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(conflict::translate)?
            .ok_or_else(|| RegistryError::not_found(Self::ENTITY, id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM enrollees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(Self::ENTITY, id));
        }

        Ok(())
    }
}
