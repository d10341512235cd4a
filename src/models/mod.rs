//! Data models module
//!
//! This module contains the persisted records and the request shapes used to
//! create and update them

pub mod attachment;
pub mod change;
pub mod contact;
pub mod department;
pub mod enrollee;
pub mod organization;

// Re-export commonly used models
pub use attachment::{Attached, AttachmentChange};
pub use change::Change;
pub use contact::{Contact, ContactDraft, ContactPayload, NewContact, UpdateContactRequest};
pub use department::{CreateDepartmentRequest, Department, DepartmentWithEnrollees, UpdateDepartmentRequest};
pub use enrollee::{CreateEnrolleeRequest, Enrollee, UpdateEnrolleeRequest};
pub use organization::{
    CreateOrganizationRequest, Organization, OrganizationChanges, OrganizationFields,
    OrganizationWithContacts, UpdateOrganizationRequest,
};
