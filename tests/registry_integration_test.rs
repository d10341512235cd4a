//! Integration tests against a live PostgreSQL database
//!
//! Each test gets a freshly truncated schema, from `TEST_DATABASE_URL` or a
//! postgres container.

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

use helpers::*;
use placement_registry::config::{IsolationLevel, StoreConfig};
use placement_registry::models::{
    AttachmentChange, Change, ContactPayload, CreateOrganizationRequest, OrganizationChanges,
    UpdateContactRequest, UpdateDepartmentRequest, UpdateEnrolleeRequest, UpdateOrganizationRequest,
};
use placement_registry::{DatabaseService, RegistryError, RelationshipManager};

#[tokio::test]
#[serial]
async fn test_duplicate_roll_code_is_a_conflict() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    registry
        .enrollees
        .create(enrollee("CS-001", "asha@example.com"), None)
        .await
        .expect("first enrollee");

    let result = registry
        .enrollees
        .create(enrollee("CS-001", "other@example.com"), None)
        .await;

    assert_matches!(result, Err(RegistryError::Conflict { field: "roll_code", .. }));
    assert_eq!(db.count_records("enrollees").await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn test_duplicate_email_is_a_conflict() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    registry
        .enrollees
        .create(enrollee("CS-001", "asha@example.com"), None)
        .await
        .unwrap();

    let result = registry
        .enrollees
        .create(enrollee("CS-002", "asha@example.com"), None)
        .await;
    assert_matches!(result, Err(RegistryError::Conflict { field: "email", .. }));
}

#[tokio::test]
#[serial]
async fn test_update_onto_taken_roll_code_is_a_conflict() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    registry.enrollees.create(enrollee("CS-001", "a@example.com"), None).await.unwrap();
    let second = registry.enrollees.create(enrollee("CS-002", "b@example.com"), None).await.unwrap();

    let request = UpdateEnrolleeRequest {
        roll_code: Some("CS-001".to_string()),
        ..Default::default()
    };
    let result = registry.enrollees.update(second.id, request, AttachmentChange::Keep).await;
    assert_matches!(result, Err(RegistryError::Conflict { field: "roll_code", .. }));

    let unchanged = registry.enrollees.get(second.id).await.unwrap();
    assert_eq!(unchanged.roll_code, "CS-002");
}

#[tokio::test]
#[serial]
async fn test_validation_runs_before_storage() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let mut request = enrollee("CS-001", "not-an-email");
    request.phone = "12345".to_string();
    request.date_of_birth = Some("2001-02-30".to_string());

    let errors = assert_matches!(
        registry.enrollees.create(request, None).await,
        Err(RegistryError::Validation(errors)) => errors
    );
    assert!(errors.has("email"));
    assert!(errors.has("phone"));
    assert!(errors.has("date_of_birth"));
    assert_eq!(db.count_records("enrollees").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_enrollee_profile_fields_round_trip() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let mut request = enrollee("CS/2024-017", "asha@example.com");
    request.date_of_birth = Some("2001-02-28".to_string());
    request.degree = Some("B.Tech".to_string());
    request.technical_skills = Some("Rust, SQL".to_string());

    let created = registry.enrollees.create(request, None).await.unwrap();
    let fetched = registry.enrollees.get(created.id).await.unwrap();

    assert_eq!(fetched.date_of_birth, chrono::NaiveDate::from_ymd_opt(2001, 2, 28));
    assert_eq!(fetched.degree.as_deref(), Some("B.Tech"));
    assert_eq!(fetched.technical_skills.as_deref(), Some("Rust, SQL"));
    assert!(fetched.photo.is_none());
}

#[tokio::test]
#[serial]
async fn test_photo_bytes_are_kept_replaced_and_cleared() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let photo: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
    let created = registry
        .enrollees
        .create(enrollee("CS-001", "asha@example.com"), Some(photo.clone()))
        .await
        .unwrap();
    assert_eq!(created.photo.as_deref(), Some(photo.as_slice()));

    // No upload on update leaves the stored bytes alone
    let request = UpdateEnrolleeRequest {
        name: Some("Asha R".to_string()),
        ..Default::default()
    };
    let kept = registry.enrollees.update(created.id, request, AttachmentChange::Keep).await.unwrap();
    assert_eq!(kept.name, "Asha R");
    assert_eq!(kept.photo.as_deref(), Some(photo.as_slice()));

    let replacement = vec![0u8, 0xff, 0x10, 0x00];
    let replaced = registry
        .enrollees
        .update(created.id, UpdateEnrolleeRequest::default(), AttachmentChange::Set(replacement.clone()))
        .await
        .unwrap();
    assert_eq!(replaced.photo, Some(replacement));

    let cleared = registry
        .enrollees
        .update(created.id, UpdateEnrolleeRequest::default(), AttachmentChange::Clear)
        .await
        .unwrap();
    assert!(cleared.photo.is_none());
}

#[tokio::test]
#[serial]
async fn test_delete_of_missing_id_is_not_found_for_every_entity() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    assert_matches!(
        registry.enrollees.delete(9999).await,
        Err(RegistryError::NotFound { entity: "Enrollee", id: 9999 })
    );
    assert_matches!(
        registry.departments.delete(9999).await,
        Err(RegistryError::NotFound { entity: "Department", id: 9999 })
    );
    assert_matches!(
        registry.organizations.delete(9999).await,
        Err(RegistryError::NotFound { entity: "Organization", id: 9999 })
    );
    assert_matches!(
        registry.organizations.delete_contact(9999).await,
        Err(RegistryError::NotFound { entity: "Contact", id: 9999 })
    );
}

#[tokio::test]
#[serial]
async fn test_update_of_missing_id_is_not_found() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    assert_matches!(
        registry.enrollees.update(42, UpdateEnrolleeRequest::default(), AttachmentChange::Keep).await,
        Err(RegistryError::NotFound { .. })
    );
    assert_matches!(
        registry.departments.update(42, UpdateDepartmentRequest::default()).await,
        Err(RegistryError::NotFound { .. })
    );
    assert_matches!(
        registry
            .organizations
            .update(42, UpdateOrganizationRequest::default(), AttachmentChange::Keep)
            .await,
        Err(RegistryError::NotFound { .. })
    );
    assert_matches!(
        registry.organizations.update_contact(42, UpdateContactRequest::default()).await,
        Err(RegistryError::NotFound { .. })
    );
}

#[tokio::test]
#[serial]
async fn test_course_name_is_unique() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    registry.departments.create(department("Computing", "B.Tech CSE")).await.unwrap();
    let result = registry.departments.create(department("Engineering", "B.Tech CSE")).await;

    assert_matches!(result, Err(RegistryError::Conflict { field: "course_name", .. }));
}

#[tokio::test]
#[serial]
async fn test_department_delete_leaves_dangling_reference() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let dept = registry.departments.create(department("Computing", "B.Tech CSE")).await.unwrap();

    let mut request = enrollee("CS-001", "asha@example.com");
    request.department_id = Some(dept.id);
    let member = registry.enrollees.create(request, None).await.unwrap();

    let with_members = registry.departments.get_with_enrollees(dept.id).await.unwrap();
    assert_eq!(with_members.enrollees.len(), 1);

    registry.departments.delete(dept.id).await.unwrap();

    let orphan = registry.enrollees.get(member.id).await.unwrap();
    assert_eq!(orphan.department_id, Some(dept.id));
    assert_matches!(
        registry.departments.get(dept.id).await,
        Err(RegistryError::NotFound { .. })
    );

    let dangling = registry.departments.dangling_enrollees().await.unwrap();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].id, member.id);

    let still_listed = registry.departments.enrollees(dept.id).await.unwrap();
    assert_eq!(still_listed.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_department_reference_can_be_cleared() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let dept = registry.departments.create(department("Computing", "B.Tech CSE")).await.unwrap();
    let mut request = enrollee("CS-001", "asha@example.com");
    request.department_id = Some(dept.id);
    let member = registry.enrollees.create(request, None).await.unwrap();

    let request = UpdateEnrolleeRequest {
        department: Change::Clear,
        ..Default::default()
    };
    let updated = registry.enrollees.update(member.id, request, AttachmentChange::Keep).await.unwrap();
    assert_eq!(updated.department_id, None);
}

#[tokio::test]
#[serial]
async fn test_zip_code_must_be_six_digits() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let short = CreateOrganizationRequest {
        fields: organization_fields("Acme Corp", "12345"),
        contacts: None,
    };
    let errors = assert_matches!(
        registry.organizations.create(short, None).await,
        Err(RegistryError::Validation(errors)) => errors
    );
    assert!(errors.has("zip_code"));

    let valid = CreateOrganizationRequest {
        fields: organization_fields("Acme Corp", "123456"),
        contacts: None,
    };
    let created = registry.organizations.create(valid, None).await.unwrap();
    assert_eq!(created.organization.zip_code, "123456");
    assert!(created.contacts.is_empty());
}

#[tokio::test]
#[serial]
async fn test_contact_set_is_replaced_not_merged() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let created = registry.organizations.create(organization("Acme Corp", contacts(3)), None).await.unwrap();
    let org_id = created.organization.id;
    let old_ids: Vec<i64> = created.contacts.iter().map(|c| c.id).collect();
    assert_eq!(old_ids.len(), 3);

    // Submitted ids are ignored
    let mut replacement = contacts(2);
    replacement[0].id = Some(old_ids[0]);

    let request = UpdateOrganizationRequest {
        changes: OrganizationChanges {
            city: Some("Mumbai".to_string()),
            ..Default::default()
        },
        contacts: Some(replacement.into()),
    };
    let updated = registry
        .organizations
        .update(org_id, request, AttachmentChange::Keep)
        .await
        .unwrap();

    assert_eq!(updated.organization.city, "Mumbai");
    assert_eq!(updated.contacts.len(), 2);
    assert!(updated.contacts.iter().all(|c| !old_ids.contains(&c.id)));

    let stored = registry.organizations.contacts(org_id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(db.count_records("contacts").await.unwrap(), 2);
}

#[tokio::test]
#[serial]
async fn test_update_without_contacts_keeps_the_set() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let created = registry.organizations.create(organization("Acme Corp", contacts(2)), None).await.unwrap();
    let request = UpdateOrganizationRequest {
        changes: OrganizationChanges {
            name: Some("Acme Corporation".to_string()),
            ..Default::default()
        },
        contacts: None,
    };

    let updated = registry
        .organizations
        .update(created.organization.id, request, AttachmentChange::Keep)
        .await
        .unwrap();
    assert_eq!(updated.contacts, created.contacts);
}

#[tokio::test]
#[serial]
async fn test_invalid_contact_rejects_whole_update() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let created = registry.organizations.create(organization("Acme Corp", contacts(2)), None).await.unwrap();
    let mut replacement = contacts(2);
    replacement[1].email = "broken".to_string();

    let request = UpdateOrganizationRequest {
        changes: OrganizationChanges::default(),
        contacts: Some(replacement.into()),
    };
    let errors = assert_matches!(
        registry
            .organizations
            .update(created.organization.id, request, AttachmentChange::Keep)
            .await,
        Err(RegistryError::Validation(errors)) => errors
    );
    assert!(errors.has("contacts[1].email"));

    let stored = registry.organizations.contacts(created.organization.id).await.unwrap();
    assert_eq!(stored, created.contacts);
}

#[tokio::test]
#[serial]
async fn test_encoded_contacts_payload() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let request = CreateOrganizationRequest {
        fields: organization_fields("Acme Corp", "411001"),
        contacts: Some(ContactPayload::Encoded(
            r#"[{"id": 77, "role": "CEO", "name": "John Doe", "email": "john@example.com"}]"#.to_string(),
        )),
    };
    let created = registry.organizations.create(request, None).await.unwrap();
    assert_eq!(created.contacts.len(), 1);
    assert_eq!(created.contacts[0].role, "CEO");

    let malformed = CreateOrganizationRequest {
        fields: organization_fields("Other Corp", "411001"),
        contacts: Some(ContactPayload::Encoded("{not json".to_string())),
    };
    let errors = assert_matches!(
        registry.organizations.create(malformed, None).await,
        Err(RegistryError::Validation(errors)) => errors
    );
    assert!(errors.has("contacts"));
    assert_eq!(db.count_records("organizations").await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn test_replace_contacts_on_missing_organization() {
    let db = TestDatabase::new().await;
    let registry = db.registry_with(&StoreConfig {
        replace_isolation: IsolationLevel::Serializable,
    });

    assert_matches!(
        registry.organizations.replace_contacts(404, contacts(1)).await,
        Err(RegistryError::NotFound { entity: "Organization", id: 404 })
    );
    assert_eq!(db.count_records("contacts").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_replace_contacts_with_empty_set() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let created = registry.organizations.create(organization("Acme Corp", contacts(2)), None).await.unwrap();
    let org_id = created.organization.id;

    let replaced = registry.organizations.replace_contacts(org_id, Vec::new()).await.unwrap();
    assert!(replaced.contacts.is_empty());

    // An empty set reads back as not found
    assert_matches!(
        registry.organizations.contacts(org_id).await,
        Err(RegistryError::NotFound { id, .. }) if id == org_id
    );
    let organization = registry.organizations.get(org_id).await.unwrap();
    assert!(organization.contacts.is_empty());
}

#[tokio::test]
#[serial]
async fn test_organization_delete_removes_contacts() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let logo = vec![0x89, b'P', b'N', b'G'];
    let created = registry
        .organizations
        .create(organization("Acme Corp", contacts(3)), Some(logo.clone()))
        .await
        .unwrap();
    assert_eq!(created.organization.logo, Some(logo));

    registry.organizations.delete(created.organization.id).await.unwrap();
    assert_eq!(db.count_records("contacts").await.unwrap(), 0);
    assert_matches!(
        registry.organizations.get_contact(created.contacts[0].id).await,
        Err(RegistryError::NotFound { .. })
    );
}

#[tokio::test]
#[serial]
async fn test_single_contact_operations() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let created = registry.organizations.create(organization("Acme Corp", Vec::new()), None).await.unwrap();
    let org_id = created.organization.id;

    assert_matches!(
        registry.organizations.add_contact(9999, contact("CEO", "John Doe", "john@example.com")).await,
        Err(RegistryError::NotFound { entity: "Organization", .. })
    );

    let added = registry
        .organizations
        .add_contact(org_id, contact("CEO", "John Doe", "john@example.com"))
        .await
        .unwrap();
    assert_eq!(added.organization_id, org_id);

    let request = UpdateContactRequest {
        role: Some("Founder".to_string()),
        ..Default::default()
    };
    let updated = registry.organizations.update_contact(added.id, request).await.unwrap();
    assert_eq!(updated.role, "Founder");
    assert_eq!(updated.email, "john@example.com");

    let listed = registry.organizations.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].contacts, vec![updated]);

    registry.organizations.delete_contact(added.id).await.unwrap();
    assert_eq!(db.count_records("contacts").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_table_counts() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    registry.health_check().await.unwrap();
    registry.departments.create(department("Computing", "B.Tech CSE")).await.unwrap();
    registry.organizations.create(organization("Acme Corp", contacts(2)), None).await.unwrap();

    let counts = registry.table_counts().await.unwrap();
    assert_eq!(counts.enrollees, 0);
    assert_eq!(counts.departments, 1);
    assert_eq!(counts.organizations, 1);
    assert_eq!(counts.contacts, 2);
}

#[tokio::test]
#[serial]
async fn test_failed_insert_keeps_previous_contact_set() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let created = registry.organizations.create(organization("Acme Corp", contacts(3)), None).await.unwrap();
    let org_id = created.organization.id;

    // The second row overflows the role column, so the insert step fails
    // after every previous contact has been deleted in the same transaction.
    let mut replacement = contacts(3);
    replacement[1].role = "Recruiter".repeat(20);

    let relationships = RelationshipManager::new(&DatabaseService::new(db.pool.clone()), &StoreConfig::default());
    assert_matches!(
        relationships.replace_contacts(org_id, replacement).await,
        Err(RegistryError::Internal(_))
    );

    let stored = registry.organizations.contacts(org_id).await.unwrap();
    assert_eq!(stored, created.contacts);
    assert_eq!(db.count_records("contacts").await.unwrap(), 3);
}

#[tokio::test]
#[serial]
async fn test_logo_bytes_are_kept_replaced_and_cleared() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let logo: Vec<u8> = (0..2048u32).map(|i| (i % 256) as u8).collect();
    let created = registry
        .organizations
        .create(organization("Acme Corp", contacts(1)), Some(logo.clone()))
        .await
        .unwrap();
    let org_id = created.organization.id;
    assert_eq!(created.organization.logo.as_deref(), Some(logo.as_slice()));

    let request = UpdateOrganizationRequest {
        changes: OrganizationChanges {
            state: Some("KA".to_string()),
            ..Default::default()
        },
        contacts: None,
    };
    let kept = registry.organizations.update(org_id, request, AttachmentChange::Keep).await.unwrap();
    assert_eq!(kept.organization.state, "KA");
    assert_eq!(kept.organization.logo.as_deref(), Some(logo.as_slice()));

    let replacement = vec![0x47, 0x49, 0x46, 0x38];
    let replaced = registry
        .organizations
        .update(org_id, UpdateOrganizationRequest::default(), AttachmentChange::Set(replacement.clone()))
        .await
        .unwrap();
    assert_eq!(replaced.organization.logo, Some(replacement));

    let cleared = registry
        .organizations
        .update(org_id, UpdateOrganizationRequest::default(), AttachmentChange::Clear)
        .await
        .unwrap();
    assert!(cleared.organization.logo.is_none());
    assert_eq!(cleared.contacts, created.contacts);
}

#[tokio::test]
#[serial]
async fn test_explicit_null_clears_optional_fields() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let mut request = enrollee("CS-001", "asha@example.com");
    request.gender = Some("F".to_string());
    request.date_of_birth = Some("2001-02-28".to_string());
    request.project_name = Some("Compiler".to_string());
    let member = registry.enrollees.create(request, None).await.unwrap();

    let request: UpdateEnrolleeRequest =
        serde_json::from_value(serde_json::json!({ "gender": null, "date_of_birth": null })).unwrap();
    let updated = registry.enrollees.update(member.id, request, AttachmentChange::Keep).await.unwrap();
    assert_eq!(updated.gender, None);
    assert_eq!(updated.date_of_birth, None);
    assert_eq!(updated.project_name.as_deref(), Some("Compiler"));

    let mut fields = organization_fields("Acme Corp", "411001");
    fields.address_line2 = Some("Block B".to_string());
    let created = registry
        .organizations
        .create(CreateOrganizationRequest { fields, contacts: Some(contacts(1).into()) }, None)
        .await
        .unwrap();

    let request = UpdateOrganizationRequest {
        changes: OrganizationChanges {
            address_line2: Change::Clear,
            ..Default::default()
        },
        contacts: None,
    };
    let updated = registry
        .organizations
        .update(created.organization.id, request, AttachmentChange::Keep)
        .await
        .unwrap();
    assert_eq!(updated.organization.address_line2, None);

    let contact_id = created.contacts[0].id;
    let request = UpdateContactRequest {
        phone: Change::Clear,
        ..Default::default()
    };
    let updated = registry.organizations.update_contact(contact_id, request).await.unwrap();
    assert_eq!(updated.phone, None);
}

#[tokio::test]
#[serial]
async fn test_overlong_values_are_rejected_before_storage() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let mut fields = organization_fields("Acme Corp", "411001");
    fields.city = "Pune".repeat(30);
    let errors = assert_matches!(
        registry
            .organizations
            .create(CreateOrganizationRequest { fields, contacts: None }, None)
            .await,
        Err(RegistryError::Validation(errors)) => errors
    );
    assert!(errors.has("city"));

    let fields = organization_fields("Acme Corp", "٤١١٠٠١");
    let errors = assert_matches!(
        registry
            .organizations
            .create(CreateOrganizationRequest { fields, contacts: None }, None)
            .await,
        Err(RegistryError::Validation(errors)) => errors
    );
    assert!(errors.has("zip_code"));
    assert_eq!(db.count_records("organizations").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_concurrent_organization_update_last_write_wins() {
    let db = TestDatabase::new().await;
    let registry = db.registry();

    let created = registry.organizations.create(organization("Acme Corp", contacts(2)), None).await.unwrap();
    let org_id = created.organization.id;

    // Another writer holds the organization row
    let mut blocker = db.pool.begin().await.unwrap();
    sqlx::query("UPDATE organizations SET city = 'Delhi' WHERE id = $1")
        .bind(org_id)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let waiting = {
        let registry = registry.clone();
        tokio::spawn(async move {
            let request = UpdateOrganizationRequest {
                changes: OrganizationChanges {
                    city: Some("Mumbai".to_string()),
                    ..Default::default()
                },
                contacts: Some(contacts(1).into()),
            };
            registry.organizations.update(org_id, request, AttachmentChange::Keep).await
        })
    };

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    blocker.commit().await.unwrap();

    let updated = waiting.await.unwrap().expect("waiting writer applies its update");
    assert_eq!(updated.organization.city, "Mumbai");
    assert_eq!(updated.contacts.len(), 1);

    let stored = registry.organizations.get(org_id).await.unwrap();
    assert_eq!(stored.organization.city, "Mumbai");
}
