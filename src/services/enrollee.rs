//! Enrollee service implementation

use tracing::debug;

use super::{delete_entity, observe, validate};
use crate::database::{EnrolleeRepository, EntityStore};
use crate::models::{Attached, AttachmentChange, CreateEnrolleeRequest, Enrollee, UpdateEnrolleeRequest};
use crate::utils::errors::Result;
use crate::utils::logging;
use crate::validation::{Mode, ValidationGate};

const ENTITY: &str = EnrolleeRepository::ENTITY;

#[derive(Debug, Clone)]
pub struct EnrolleeService {
    repository: EnrolleeRepository,
}

impl EnrolleeService {
    pub fn new(repository: EnrolleeRepository) -> Self {
        Self { repository }
    }

    /// Register a new enrollee with an optional photo.
    ///
    /// The department reference is stored as given; it is not checked
    /// against existing departments.
    pub async fn create(&self, request: CreateEnrolleeRequest, photo: Option<Vec<u8>>) -> Result<Enrollee> {
        validate(ENTITY, "create", ValidationGate::enrollee(), &request, Mode::Create)?;

        debug!(roll_code = %request.roll_code, has_photo = photo.is_some(), "Creating enrollee");
        let enrollee = observe(
            ENTITY,
            "create",
            self.repository.create(Attached::new(request, photo)).await,
        )?;

        logging::log_entity_write(ENTITY, "create", enrollee.id);
        Ok(enrollee)
    }

    pub async fn list(&self) -> Result<Vec<Enrollee>> {
        observe(ENTITY, "list", self.repository.list().await)
    }

    pub async fn get(&self, id: i64) -> Result<Enrollee> {
        observe(ENTITY, "get", self.repository.get(id).await)
    }

    /// Update the supplied fields; `photo` decides whether the stored photo
    /// is kept, replaced or cleared
    pub async fn update(
        &self,
        id: i64,
        request: UpdateEnrolleeRequest,
        photo: AttachmentChange,
    ) -> Result<Enrollee> {
        validate(ENTITY, "update", ValidationGate::enrollee(), &request, Mode::Update)?;

        let enrollee = observe(
            ENTITY,
            "update",
            self.repository.update(id, Attached::change(request, photo)).await,
        )?;

        logging::log_entity_write(ENTITY, "update", id);
        Ok(enrollee)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        delete_entity(&self.repository, id).await
    }
}
