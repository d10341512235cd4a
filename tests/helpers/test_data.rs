//! Request builders for integration tests

use placement_registry::models::{
    ContactDraft, CreateDepartmentRequest, CreateEnrolleeRequest, CreateOrganizationRequest,
    OrganizationFields,
};

pub fn enrollee(roll_code: &str, email: &str) -> CreateEnrolleeRequest {
    CreateEnrolleeRequest {
        name: "Asha Rao".to_string(),
        roll_code: roll_code.to_string(),
        email: email.to_string(),
        phone: "9876543210".to_string(),
        category: "General".to_string(),
        ..Default::default()
    }
}

pub fn department(department_name: &str, course_name: &str) -> CreateDepartmentRequest {
    CreateDepartmentRequest {
        department_name: department_name.to_string(),
        course_name: course_name.to_string(),
    }
}

pub fn organization_fields(name: &str, zip_code: &str) -> OrganizationFields {
    OrganizationFields {
        name: name.to_string(),
        address_line1: "1 Main Road".to_string(),
        address_line2: None,
        city: "Pune".to_string(),
        state: "MH".to_string(),
        zip_code: zip_code.to_string(),
    }
}

pub fn organization(name: &str, contacts: Vec<ContactDraft>) -> CreateOrganizationRequest {
    CreateOrganizationRequest {
        fields: organization_fields(name, "411001"),
        contacts: Some(contacts.into()),
    }
}

pub fn contact(role: &str, name: &str, email: &str) -> ContactDraft {
    ContactDraft {
        id: None,
        role: role.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: Some("02012345678".to_string()),
    }
}

/// `count` distinct, valid contacts
pub fn contacts(count: usize) -> Vec<ContactDraft> {
    const NAMES: [&str; 5] = ["John Doe", "Jane Roe", "Ravi Kumar", "Meera Iyer", "Sam Lee"];
    (0..count)
        .map(|i| {
            contact(
                "Recruiter",
                NAMES[i % NAMES.len()],
                &format!("contact{}@example.com", i),
            )
        })
        .collect()
}
