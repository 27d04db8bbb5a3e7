//! Access query engine: projections, reports and statistics.
//!
//! Tests cover:
//! - One report entry per application access level
//! - The Customer Portal scenario
//! - Report idempotence and export shape
//! - Grant listings, effective permissions and generated users

use std::collections::HashSet;

use chrono::NaiveDate;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use warden_core::catalog::SeedData;
use warden_core::models::{AccessPatch, GrantRequest, NewUser};
use warden_core::query::{export_file_name, GrantFilter, ReportExport};
use warden_core::store::{EntityStore, StoreSettings};

fn store() -> EntityStore {
    EntityStore::builtin().unwrap()
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_report_has_entry_for_every_level() {
    let store = store();
    for app in store.applications() {
        let report = store.query().generate_access_report(&app.id).unwrap();
        let reported: Vec<_> = report
            .users_by_access_level
            .iter()
            .map(|usage| usage.access_level_id.clone())
            .collect();
        assert_eq!(reported, app.access_level_ids(), "levels of {}", app.name);
    }
}

#[test]
fn test_customer_portal_scenario() {
    let store = store();
    let report = store.query().generate_access_report(&"1".into()).unwrap();

    assert_eq!(report.application_name, "Customer Portal");
    assert_eq!(report.total_users, 2);

    let viewer = report.level_named("Viewer").unwrap();
    assert_eq!(viewer.user_count, 0);
    assert!(viewer.users.is_empty());

    let editor = report.level_named("Editor").unwrap();
    assert_eq!(editor.user_count, 1);
    assert_eq!(editor.users[0].email, "john.doe@company.com");

    assert_eq!(report.level_named("Manager").unwrap().user_count, 1);
    assert_eq!(report.level_named("Administrator").unwrap().user_count, 0);
    assert!(report.custom_permissions.is_empty());
}

#[test]
fn test_repeat_grant_counts_once_per_grant() {
    let mut store = store();
    store.grant_access(GrantRequest::new("1", "1", "2")).unwrap();

    let report = store.query().generate_access_report(&"1".into()).unwrap();
    assert_eq!(report.total_users, 3);

    let editor = report.level_named("Editor").unwrap();
    assert_eq!(editor.user_count, 2);
    assert_eq!(editor.users[0].id, editor.users[1].id);

    let level_sum: usize = report.users_by_access_level.iter().map(|u| u.user_count).sum();
    assert_eq!(level_sum, report.total_users);
    assert_eq!(store.query().users_for_application(&"1".into()).len(), 3);
}

#[test]
fn test_reports_are_idempotent() {
    let store = store();
    let first = store.query().generate_access_report(&"5".into()).unwrap();
    let second = store.query().generate_access_report(&"5".into()).unwrap();

    assert_eq!(first.users_by_access_level, second.users_by_access_level);
    assert_eq!(first.total_users, second.total_users);
    assert!(second.report_generated_at >= first.report_generated_at);
}

#[test]
fn test_inactive_grants_are_not_reported() {
    let mut store = store();
    store
        .update_access(
            &"6".into(),
            AccessPatch {
                is_active: Some(false),
                ..AccessPatch::default()
            },
        )
        .unwrap();

    let report = store.query().generate_access_report(&"4".into()).unwrap();
    assert_eq!(report.total_users, 3);
    let viewer = report.level_named("GitHub Viewer").unwrap();
    assert_eq!(viewer.user_count, 1);
    assert_eq!(viewer.users[0].name, "Alice Brown");
}

#[test]
fn test_export_document_round_trips_through_json() {
    let store = store();
    let report = store.query().generate_access_report(&"4".into()).unwrap();
    let export = report.to_export();

    let json = serde_json::to_string_pretty(&export).unwrap();
    let parsed: ReportExport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.application_name, "GitHub");
    assert_eq!(parsed.total_users, 4);
    assert_eq!(parsed.users_by_access_level.len(), 4);
    assert_eq!(parsed.custom_permissions.len(), 36);
    assert!(report.export_file_name().starts_with("access-report-github-"));
}

#[test]
fn test_export_file_name_slug() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
    assert_eq!(
        export_file_name("Internal HR System", date),
        "access-report-internal-hr-system-2024-01-20.json"
    );
}

// ============================================================================
// Projections
// ============================================================================

#[test]
fn test_dangling_grants_cannot_be_seeded() {
    let mut seed = store().to_seed();
    seed.users.retain(|user| user.id.as_str() != "2");

    let err = EntityStore::from_seed(seed, &StoreSettings::default()).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_list_grants_joins_names() {
    let store = store();
    let rows = store.query().list_grants(&GrantFilter::new().user("4"));

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.user_name == "Alice Brown"));
    let apps: Vec<&str> = rows.iter().map(|row| row.application_name.as_str()).collect();
    assert_eq!(apps, vec!["GitHub", "MongoDB"]);
}

#[test]
fn test_effective_permissions_union() {
    let mut store = store();
    // A second grant at a different level widens the set
    let viewer_only = store
        .query()
        .effective_permissions(&"2".into(), &"4".into())
        .unwrap()
        .len();
    store
        .grant_access(GrantRequest::new("2", "4", "7"))
        .unwrap();
    let widened = store
        .query()
        .effective_permissions(&"2".into(), &"4".into())
        .unwrap();

    assert!(widened.len() > viewer_only);
    let unique: HashSet<_> = widened.iter().map(|perm| &perm.id).collect();
    assert_eq!(unique.len(), widened.len());
}

#[test]
fn test_generated_users_show_up_in_reports() {
    let mut store = EntityStore::from_seed(SeedData::builtin(), &StoreSettings::default()).unwrap();

    for _ in 0..25 {
        let user = store
            .create_user(NewUser {
                name: Name().fake(),
                email: SafeEmail().fake(),
                role: "Contractor".to_string(),
                department: None,
                is_active: true,
            })
            .unwrap();
        store
            .grant_access(GrantRequest::new(user.id, "3", "1"))
            .unwrap();
    }

    let report = store.query().generate_access_report(&"3".into()).unwrap();
    assert_eq!(report.total_users, 26);
    assert_eq!(report.level_named("Viewer").unwrap().user_count, 25);
    assert_eq!(store.query().dashboard_stats(5).total_users, 29);
}
