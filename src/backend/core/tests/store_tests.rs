//! Entity store behaviour against the built-in dataset.
//!
//! Tests cover:
//! - Record creation with injected id generators
//! - Cascading deletes for users, applications and access levels
//! - Grant reference checks
//! - Atomicity of failed mutations

use std::sync::Arc;

use warden_core::catalog::SeedData;
use warden_core::error::ErrorCode;
use warden_core::models::{
    AccessId, AccessPatch, ApplicationPatch, GrantRequest, NewAccessLevel, NewApplication, NewUser,
    PermissionId, UserPatch,
};
use warden_core::store::{EntityStore, IdStrategy, StoreSettings, UuidIdGenerator};

fn store() -> EntityStore {
    EntityStore::builtin().expect("builtin dataset is consistent")
}

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        role: "Engineer".to_string(),
        department: Some("Engineering".to_string()),
        is_active: true,
    }
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_sequential_ids_do_not_collide() {
    let mut store = store();
    let a = store.create_user(new_user("Eve", "eve@company.com")).unwrap();
    let b = store.create_user(new_user("Frank", "frank@company.com")).unwrap();

    assert_eq!(a.id.as_str(), "5");
    assert_eq!(b.id.as_str(), "6");
    assert!(a.created_at <= b.created_at);
}

#[test]
fn test_uuid_strategy() {
    let settings = StoreSettings {
        id_strategy: IdStrategy::Uuid,
        ..StoreSettings::default()
    };
    let mut store = EntityStore::from_seed(SeedData::builtin(), &settings).unwrap();
    let user = store.create_user(new_user("Eve", "eve@company.com")).unwrap();
    assert_eq!(user.id.as_str().len(), 36);
}

#[test]
fn test_largest_numeric_id_exhausts_sequence() {
    let mut seed = SeedData::builtin();
    let mut last = seed.users[0].clone();
    last.id = u64::MAX.to_string().into();
    seed.users.push(last);

    let mut store = EntityStore::from_seed(seed, &StoreSettings::default()).unwrap();
    let err = store.create_user(new_user("Eve", "eve@company.com")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(store.users().len(), 5);

    let grant = store.grant_access(GrantRequest::new("4", "3", "2")).unwrap();
    assert_eq!(grant.id.as_str(), "13");
}

#[test]
fn test_injected_generator_is_used() {
    let mut store = store().with_id_generator(Arc::new(UuidIdGenerator));
    let grant = store.grant_access(GrantRequest::new("4", "3", "2")).unwrap();
    assert!(grant.id.as_number().is_none());
}

#[test]
fn test_update_preserves_identity_and_creation_time() {
    let mut store = store();
    let before = store.user(&"2".into()).unwrap().clone();

    let after = store
        .update_user(
            &"2".into(),
            UserPatch {
                role: Some("Director".to_string()),
                department: Some(None),
                ..UserPatch::default()
            },
        )
        .unwrap();

    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.role, "Director");
    assert!(after.department.is_none());
}

// ============================================================================
// Cascades
// ============================================================================

#[test]
fn test_deleting_user_leaves_no_orphans() {
    let mut store = store();
    store.grant_access(GrantRequest::new("3", "1", "1")).unwrap();
    store.grant_access(GrantRequest::new("3", "1", "1")).unwrap();

    let removal = store.delete_user(&"3".into()).unwrap();

    assert_eq!(removal.cascaded_grants.len(), 5);
    assert!(store.user_access().iter().all(|g| g.user_id.as_str() != "3"));
    assert!(store.query().applications_for_user(&"3".into()).is_empty());
}

#[test]
fn test_deleting_github_removes_its_grants() {
    let mut store = store();
    let removal = store.delete_application(&"4".into()).unwrap();

    assert_eq!(removal.record.name, "GitHub");
    assert_eq!(removal.cascaded_grants.len(), 4);
    assert!(store.user_access().iter().all(|g| g.application_id.as_str() != "4"));
    assert!(store.applications().iter().all(|app| app.name != "GitHub"));
    assert_eq!(store.user_access().len(), 8);
}

#[test]
fn test_deleting_global_level_touches_every_application() {
    let mut store = store();
    let removal = store.delete_access_level(&"2".into()).unwrap();

    assert_eq!(removal.cascaded_grants, vec![AccessId::from("1")]);
    for app_id in ["1", "2", "3"] {
        let app = store.application(&app_id.into()).unwrap();
        assert_eq!(app.access_levels.len(), 3);
    }
}

#[test]
fn test_missing_ids_are_not_found() {
    let mut store = store();
    assert_eq!(
        store.delete_user(&"404".into()).unwrap_err().code(),
        ErrorCode::RecordNotFound
    );
    assert_eq!(
        store.delete_application(&"404".into()).unwrap_err().code(),
        ErrorCode::RecordNotFound
    );
    assert_eq!(
        store.delete_access_level(&"404".into()).unwrap_err().code(),
        ErrorCode::RecordNotFound
    );
    assert_eq!(
        store
            .update_access(&"404".into(), AccessPatch::default())
            .unwrap_err()
            .code(),
        ErrorCode::RecordNotFound
    );
}

// ============================================================================
// Grants
// ============================================================================

#[test]
fn test_grant_level_must_belong_to_application() {
    let mut store = store();
    // MongoDB Viewer exists globally but GitHub does not offer it
    let err = store.grant_access(GrantRequest::new("1", "4", "9")).unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(err
        .details()
        .field_errors
        .as_ref()
        .is_some_and(|errors| errors.has_errors("accessLevelId")));
}

#[test]
fn test_grant_with_unknown_references() {
    let mut store = store();
    let err = store
        .grant_access(GrantRequest::new("404", "405", "406"))
        .unwrap_err();
    let errors = err.details().field_errors.clone().unwrap();

    assert!(errors.has_errors("userId"));
    assert!(errors.has_errors("applicationId"));
    assert!(errors.has_errors("accessLevelId"));
}

#[test]
fn test_custom_permissions_must_belong_to_application() {
    let mut store = store();
    let ok = store
        .grant_access(GrantRequest::new("2", "2", "1").with_custom_permissions(["6"]))
        .unwrap();
    assert_eq!(ok.custom_permissions, vec![PermissionId::from("6")]);

    let err = store
        .grant_access(GrantRequest::new("2", "3", "1").with_custom_permissions(["6"]))
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_duplicate_grants_are_independent() {
    let mut store = store();
    let first = store.grant_access(GrantRequest::new("4", "1", "1")).unwrap();
    let second = store
        .grant_access(GrantRequest::new("4", "1", "1").granted_by("it@company.com"))
        .unwrap();

    assert_ne!(first.id, second.id);
    store.revoke_access(&first.id).unwrap();
    assert!(store.grant(&second.id).is_some());
}

#[test]
fn test_revoked_grant_never_reappears() {
    let mut store = store();
    store.revoke_access(&"5".into()).unwrap();

    let query = store.query();
    assert!(store.user_access().iter().all(|g| g.id.as_str() != "5"));
    assert!(query
        .list_grants(&Default::default())
        .iter()
        .all(|d| d.grant.id.as_str() != "5"));
    let report = query.generate_access_report(&"4".into()).unwrap();
    assert_eq!(report.total_users, 3);
}

#[test]
fn test_deactivating_grant_keeps_record() {
    let mut store = store();
    let updated = store
        .update_access(
            &"2".into(),
            AccessPatch {
                is_active: Some(false),
                ..AccessPatch::default()
            },
        )
        .unwrap();

    assert!(!updated.is_active);
    assert_eq!(store.user_access().len(), 12);
    assert_eq!(store.query().active_grant_count(&"2".into()), 2);
}

// ============================================================================
// Atomicity
// ============================================================================

#[test]
fn test_failed_application_create_changes_nothing() {
    let mut store = store();
    let before = store.to_seed();

    let err = store
        .create_application(NewApplication {
            name: "Wiki".to_string(),
            category: "Docs".to_string(),
            access_levels: Some(vec!["1".into(), "999".into()]),
            ..NewApplication::default()
        })
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(store.to_seed(), before);
}

#[test]
fn test_failed_access_level_create_changes_nothing() {
    let mut store = store();
    let before = store.to_seed();

    let err = store
        .create_access_level(NewAccessLevel {
            name: "Auditor".to_string(),
            permissions: vec!["1".into(), "1000".into()],
            application_id: Some("1".into()),
            ..NewAccessLevel::default()
        })
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(store.to_seed(), before);
}

#[test]
fn test_application_update_can_add_levels() {
    let mut store = store();
    let app = store
        .update_application(
            &"1".into(),
            ApplicationPatch {
                access_levels: Some(vec!["1".into(), "2".into(), "3".into(), "4".into(), "5".into()]),
                url: Some(None),
                ..ApplicationPatch::default()
            },
        )
        .unwrap();

    assert_eq!(app.access_levels.len(), 5);
    assert!(app.url.is_none());
    store.grant_access(GrantRequest::new("3", "1", "5")).unwrap();
}
