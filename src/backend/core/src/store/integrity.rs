//! Structural checks over a complete dataset.
//!
//! Every command keeps these invariants by construction; this module checks
//! data that enters from outside (seed files) and is used by tests to
//! confirm that no command leaves the store inconsistent.

use std::collections::HashSet;

use tracing::warn;

use crate::catalog::SeedData;
use crate::error::{Result, WardenError};
use crate::models::EntityKind;
use crate::validation::{ValidationErrorKind, ValidationErrors};

fn first_duplicate<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

fn check_unique_ids(data: &SeedData) -> Result<()> {
    let collections: [(EntityKind, Option<&str>); 5] = [
        (EntityKind::User, first_duplicate(data.users.iter().map(|u| u.id.as_str()))),
        (
            EntityKind::Application,
            first_duplicate(data.applications.iter().map(|a| a.id.as_str())),
        ),
        (
            EntityKind::AccessLevel,
            first_duplicate(data.access_levels.iter().map(|l| l.id.as_str())),
        ),
        (
            EntityKind::Permission,
            first_duplicate(data.permissions.iter().map(|p| p.id.as_str())),
        ),
        (
            EntityKind::UserAccess,
            first_duplicate(data.user_access.iter().map(|g| g.id.as_str())),
        ),
    ];

    for (kind, duplicate) in collections {
        if let Some(id) = duplicate {
            return Err(WardenError::duplicate(kind.as_str(), id));
        }
    }
    Ok(())
}

fn check_references(data: &SeedData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let permission_ids: HashSet<&str> = data.permissions.iter().map(|p| p.id.as_str()).collect();
    let level_ids: HashSet<&str> = data.access_levels.iter().map(|l| l.id.as_str()).collect();
    let user_ids: HashSet<&str> = data.users.iter().map(|u| u.id.as_str()).collect();

    for (index, level) in data.access_levels.iter().enumerate() {
        for perm in &level.permissions {
            if !permission_ids.contains(perm.as_str()) {
                errors.add_unknown_reference(
                    format!("accessLevels[{}].permissions", index),
                    EntityKind::Permission.as_str(),
                    perm.as_str(),
                );
            }
        }
    }

    for (index, app) in data.applications.iter().enumerate() {
        if first_duplicate(app.access_levels.iter().map(|l| l.id.as_str())).is_some() {
            errors.add_error(
                format!("applications[{}].accessLevels", index),
                ValidationErrorKind::DuplicateItems,
            );
        }
        for level in &app.access_levels {
            if !level_ids.contains(level.id.as_str()) {
                errors.add_unknown_reference(
                    format!("applications[{}].accessLevels", index),
                    EntityKind::AccessLevel.as_str(),
                    level.id.as_str(),
                );
            }
        }
        for perm in &app.custom_permissions {
            if !permission_ids.contains(perm.id.as_str()) {
                errors.add_unknown_reference(
                    format!("applications[{}].customPermissions", index),
                    EntityKind::Permission.as_str(),
                    perm.id.as_str(),
                );
            }
        }
    }

    for (index, grant) in data.user_access.iter().enumerate() {
        let field = |name: &str| format!("userAccess[{}].{}", index, name);

        if !user_ids.contains(grant.user_id.as_str()) {
            errors.add_unknown_reference(field("userId"), EntityKind::User.as_str(), grant.user_id.as_str());
        }

        let Some(app) = data.applications.iter().find(|a| a.id == grant.application_id) else {
            errors.add_unknown_reference(
                field("applicationId"),
                EntityKind::Application.as_str(),
                grant.application_id.as_str(),
            );
            continue;
        };

        if !app.has_access_level(&grant.access_level_id) {
            errors.add_with_message(
                field("accessLevelId"),
                ValidationErrorKind::NotInSet {
                    allowed: app.access_level_ids().iter().map(ToString::to_string).collect(),
                },
                format!(
                    "access level {} is not offered by application {}",
                    grant.access_level_id, app.id
                ),
            );
        }

        for perm in &grant.custom_permissions {
            if app.custom_permission(perm).is_none() {
                errors.add_with_message(
                    field("customPermissions"),
                    ValidationErrorKind::UnknownItems {
                        unknown: vec![perm.to_string()],
                    },
                    format!("permission {} is not a custom permission of application {}", perm, app.id),
                );
            }
        }
    }

    errors
}

/// Check id uniqueness and every cross-entity reference of `data`.
pub fn check(data: &SeedData) -> Result<()> {
    check_unique_ids(data)?;

    let errors = check_references(data);
    if errors.is_empty() {
        Ok(())
    } else {
        warn!(violations = errors.error_count(), "Dataset failed integrity check");
        Err(WardenError::invalid_fields("dataset", errors))
    }
}

/// Replace the access levels and custom permissions embedded in each
/// application by the catalog entries with the same id.
///
/// Must run after [`check`], which guarantees every embedded id resolves.
pub(crate) fn align_with_catalog(data: &mut SeedData) {
    let SeedData {
        applications,
        access_levels,
        permissions,
        ..
    } = data;

    for app in applications.iter_mut() {
        for level in app.access_levels.iter_mut() {
            if let Some(catalog_level) = access_levels.iter().find(|l| l.id == level.id) {
                *level = catalog_level.clone();
            }
        }
        for perm in app.custom_permissions.iter_mut() {
            if let Some(catalog_perm) = permissions.iter().find(|p| p.id == perm.id) {
                *perm = catalog_perm.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::{AccessLevelId, ApplicationId, UserId};

    #[test]
    fn test_builtin_dataset_is_consistent() {
        assert!(check(&SeedData::builtin()).is_ok());
    }

    #[test]
    fn test_duplicate_user_id() {
        let mut data = SeedData::builtin();
        let copy = data.users[0].clone();
        data.users.push(copy);

        let err = check(&data).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
        assert_eq!(err.details().entity_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_grant_with_foreign_access_level() {
        let mut data = SeedData::builtin();
        // GitHub Viewer on the Customer Portal
        data.user_access[0].access_level_id = AccessLevelId::from("5");

        let err = check(&data).unwrap_err();
        assert!(err.is_validation());
        let fields = err.details().field_errors.as_ref().unwrap();
        assert!(fields.has_errors("userAccess[0].accessLevelId"));
    }

    #[test]
    fn test_grant_with_missing_user_and_application() {
        let mut data = SeedData::builtin();
        data.user_access[1].user_id = UserId::from("99");
        data.user_access[2].application_id = ApplicationId::from("99");

        let err = check(&data).unwrap_err();
        let fields = err.details().field_errors.as_ref().unwrap();
        assert!(fields.has_errors("userAccess[1].userId"));
        assert!(fields.has_errors("userAccess[2].applicationId"));
    }

    #[test]
    fn test_access_level_with_unknown_permission() {
        let mut data = SeedData::builtin();
        data.access_levels[0].permissions.push("999".into());

        let err = check(&data).unwrap_err();
        let fields = err.details().field_errors.as_ref().unwrap();
        assert!(fields.has_errors("accessLevels[0].permissions"));
    }

    #[test]
    fn test_align_with_catalog_overrides_embedded_copies() {
        let mut data = SeedData::builtin();
        data.applications[0].access_levels[1].name = "Stale Editor".into();

        align_with_catalog(&mut data);
        assert_eq!(data.applications[0].access_levels[1].name, "Editor");
    }
}
