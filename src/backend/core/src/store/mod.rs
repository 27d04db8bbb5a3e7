//! The entity store: sole owner of the five registry collections.
//!
//! Every mutation validates its input and all references it touches before
//! changing anything, so a failed call leaves the store untouched. Deletes
//! cascade to the grants that reference the deleted record.

pub mod ids;
pub mod integrity;

pub use ids::{IdGenerator, IdStrategy, SequentialIdGenerator, UuidIdGenerator};

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{SeedData, DEFAULT_GRANTED_BY};
use crate::error::{Result, WardenError};
use crate::models::{
    AccessId, AccessLevel, AccessLevelId, AccessLevelPatch, AccessPatch, Application,
    ApplicationId, ApplicationPatch, EntityKind, GrantRequest, NewAccessLevel, NewApplication,
    NewUser, Permission, PermissionId, User, UserAccess, UserId, UserPatch,
};
use crate::telemetry::metric_names;
use crate::validation::{
    AllOf, OneOf, Validate, ValidationErrorKind, ValidationErrors, ValidationRule,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════════════════

/// Construction-time settings of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub id_strategy: IdStrategy,
    /// Actor recorded on grants that do not name one.
    pub default_granted_by: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            default_granted_by: DEFAULT_GRANTED_BY.to_string(),
        }
    }
}

/// A deleted record together with the grants removed along with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Removal<T> {
    pub record: T,
    pub cascaded_grants: Vec<AccessId>,
}

fn validated<T: Validate>(kind: EntityKind, payload: &T) -> Result<()> {
    payload
        .validate()
        .map_err(|errors| WardenError::invalid_fields(kind.as_str(), errors))
}

fn rejected(kind: EntityKind, errors: ValidationErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(WardenError::invalid_fields(kind.as_str(), errors))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Entity Store
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory registry state.
///
/// Cloning is cheap enough for copy-on-write snapshots; clones share the id
/// generator so ids stay unique across them.
#[derive(Debug, Clone)]
pub struct EntityStore {
    data: SeedData,
    ids: Arc<dyn IdGenerator>,
    default_granted_by: String,
}

impl EntityStore {
    // ─────────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a store from a dataset after checking its integrity.
    pub fn from_seed(mut seed: SeedData, settings: &StoreSettings) -> Result<Self> {
        integrity::check(&seed)?;
        integrity::align_with_catalog(&mut seed);

        info!(
            users = seed.users.len(),
            applications = seed.applications.len(),
            access_levels = seed.access_levels.len(),
            permissions = seed.permissions.len(),
            grants = seed.user_access.len(),
            id_strategy = %settings.id_strategy,
            "Entity store seeded"
        );

        Ok(Self {
            ids: settings.id_strategy.generator(&seed),
            data: seed,
            default_granted_by: settings.default_granted_by.clone(),
        })
    }

    /// The built-in sample dataset with default settings.
    pub fn builtin() -> Result<Self> {
        Self::from_seed(SeedData::builtin(), &StoreSettings::default())
    }

    /// Replace the id generator.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Collections
    // ─────────────────────────────────────────────────────────────────────────

    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    pub fn applications(&self) -> &[Application] {
        &self.data.applications
    }

    /// The access level catalog: global and application-specific levels.
    pub fn access_levels(&self) -> &[AccessLevel] {
        &self.data.access_levels
    }

    /// The permission catalog.
    pub fn permissions(&self) -> &[Permission] {
        &self.data.permissions
    }

    /// Every grant, in insertion order.
    pub fn user_access(&self) -> &[UserAccess] {
        &self.data.user_access
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.data.users.iter().find(|user| &user.id == id)
    }

    pub fn application(&self, id: &ApplicationId) -> Option<&Application> {
        self.data.applications.iter().find(|app| &app.id == id)
    }

    pub fn access_level(&self, id: &AccessLevelId) -> Option<&AccessLevel> {
        self.data.access_levels.iter().find(|level| &level.id == id)
    }

    pub fn permission(&self, id: &PermissionId) -> Option<&Permission> {
        self.data.permissions.iter().find(|perm| &perm.id == id)
    }

    pub fn grant(&self, id: &AccessId) -> Option<&UserAccess> {
        self.data.user_access.iter().find(|grant| &grant.id == id)
    }

    pub fn default_granted_by(&self) -> &str {
        &self.default_granted_by
    }

    /// Borrow the full dataset.
    pub fn dataset(&self) -> &SeedData {
        &self.data
    }

    /// Copy the current state into the seed format.
    pub fn to_seed(&self) -> SeedData {
        self.data.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    pub fn create_user(&mut self, input: NewUser) -> Result<User> {
        validated(EntityKind::User, &input)?;

        let user = User {
            id: UserId::new(self.ids.next_id(EntityKind::User)?),
            name: input.name,
            email: input.email,
            role: input.role,
            department: input.department,
            is_active: input.is_active,
            created_at: Utc::now(),
            last_login: None,
        };

        debug!(user_id = %user.id, "User created");
        self.data.users.push(user.clone());
        Ok(user)
    }

    pub fn update_user(&mut self, id: &UserId, patch: UserPatch) -> Result<User> {
        let index = self
            .data
            .users
            .iter()
            .position(|user| &user.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::User.as_str(), id.as_str()))?;
        validated(EntityKind::User, &patch)?;

        let user = &mut self.data.users[index];
        user.apply_patch(patch);
        debug!(user_id = %id, "User updated");
        Ok(user.clone())
    }

    /// Remove a user and every grant held by them.
    pub fn delete_user(&mut self, id: &UserId) -> Result<Removal<User>> {
        let index = self
            .data
            .users
            .iter()
            .position(|user| &user.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::User.as_str(), id.as_str()))?;

        let record = self.data.users.remove(index);
        let cascaded_grants = self.purge_grants("user", |grant| &grant.user_id == id);
        Ok(Removal {
            record,
            cascaded_grants,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Applications
    // ─────────────────────────────────────────────────────────────────────────

    pub fn create_application(&mut self, input: NewApplication) -> Result<Application> {
        validated(EntityKind::Application, &input)?;

        let mut errors = ValidationErrors::new();
        let access_levels = match &input.access_levels {
            Some(ids) => self.resolve_levels(ids, &mut errors),
            None => self.global_levels(),
        };
        let custom_permissions =
            self.resolve_permissions(&input.custom_permissions, "customPermissions", &mut errors);
        rejected(EntityKind::Application, errors)?;

        let app = Application {
            id: ApplicationId::new(self.ids.next_id(EntityKind::Application)?),
            name: input.name,
            description: input.description,
            url: input.url.filter(|url| !url.trim().is_empty()),
            category: input.category,
            is_active: input.is_active,
            created_at: Utc::now(),
            access_levels,
            custom_permissions,
        };

        debug!(
            application_id = %app.id,
            access_levels = app.access_levels.len(),
            custom_permissions = app.custom_permissions.len(),
            "Application created"
        );
        self.data.applications.push(app.clone());
        Ok(app)
    }

    /// Update an application.
    ///
    /// Narrowing the access levels or custom permissions fails while a grant
    /// on this application still references a removed entry.
    pub fn update_application(
        &mut self,
        id: &ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<Application> {
        let index = self
            .data
            .applications
            .iter()
            .position(|app| &app.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::Application.as_str(), id.as_str()))?;
        validated(EntityKind::Application, &patch)?;

        let mut errors = ValidationErrors::new();
        let access_levels = patch
            .access_levels
            .as_ref()
            .map(|ids| self.resolve_levels(ids, &mut errors));
        let custom_permissions = patch
            .custom_permissions
            .as_ref()
            .map(|ids| self.resolve_permissions(ids, "customPermissions", &mut errors));

        let current = &self.data.applications[index];
        let next_levels = access_levels.as_deref().unwrap_or(&current.access_levels);
        let next_customs = custom_permissions
            .as_deref()
            .unwrap_or(&current.custom_permissions);
        self.check_grants_still_fit(id, next_levels, next_customs, &mut errors);
        rejected(EntityKind::Application, errors)?;

        let app = &mut self.data.applications[index];
        if let Some(name) = patch.name {
            app.name = name;
        }
        if let Some(description) = patch.description {
            app.description = description;
        }
        if let Some(url) = patch.url {
            app.url = url.filter(|url| !url.trim().is_empty());
        }
        if let Some(category) = patch.category {
            app.category = category;
        }
        if let Some(is_active) = patch.is_active {
            app.is_active = is_active;
        }
        if let Some(levels) = access_levels {
            app.access_levels = levels;
        }
        if let Some(customs) = custom_permissions {
            app.custom_permissions = customs;
        }

        debug!(application_id = %id, "Application updated");
        Ok(app.clone())
    }

    /// Remove an application and every grant on it.
    pub fn delete_application(&mut self, id: &ApplicationId) -> Result<Removal<Application>> {
        let index = self
            .data
            .applications
            .iter()
            .position(|app| &app.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::Application.as_str(), id.as_str()))?;

        let record = self.data.applications.remove(index);
        let cascaded_grants = self.purge_grants("application", |grant| &grant.application_id == id);
        Ok(Removal {
            record,
            cascaded_grants,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access levels
    // ─────────────────────────────────────────────────────────────────────────

    pub fn create_access_level(&mut self, input: NewAccessLevel) -> Result<AccessLevel> {
        validated(EntityKind::AccessLevel, &input)?;

        let mut errors = ValidationErrors::new();
        self.check_permissions_exist(&input.permissions, "permissions", &mut errors);
        let target = match &input.application_id {
            Some(app_id) => {
                let position = self.data.applications.iter().position(|app| &app.id == app_id);
                if position.is_none() {
                    errors.add_unknown_reference(
                        "applicationId",
                        EntityKind::Application.as_str(),
                        app_id.as_str(),
                    );
                }
                position
            }
            None => None,
        };
        rejected(EntityKind::AccessLevel, errors)?;

        let level = AccessLevel {
            id: AccessLevelId::new(self.ids.next_id(EntityKind::AccessLevel)?),
            name: input.name,
            description: input.description,
            permissions: input.permissions,
            is_custom: input.is_custom,
        };

        self.data.access_levels.push(level.clone());
        if let Some(index) = target {
            self.data.applications[index].access_levels.push(level.clone());
        }

        debug!(
            access_level_id = %level.id,
            application_id = ?input.application_id,
            "Access level created"
        );
        Ok(level)
    }

    /// Update a catalog access level and every application copy of it.
    pub fn update_access_level(
        &mut self,
        id: &AccessLevelId,
        patch: AccessLevelPatch,
    ) -> Result<AccessLevel> {
        let index = self
            .data
            .access_levels
            .iter()
            .position(|level| &level.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::AccessLevel.as_str(), id.as_str()))?;
        validated(EntityKind::AccessLevel, &patch)?;

        let mut errors = ValidationErrors::new();
        if let Some(permissions) = &patch.permissions {
            self.check_permissions_exist(permissions, "permissions", &mut errors);
        }
        rejected(EntityKind::AccessLevel, errors)?;

        let level = &mut self.data.access_levels[index];
        level.apply_patch(patch);
        let updated = level.clone();

        let mut propagated = 0usize;
        for app in self.data.applications.iter_mut() {
            for embedded in app.access_levels.iter_mut().filter(|l| &l.id == id) {
                *embedded = updated.clone();
                propagated += 1;
            }
        }

        debug!(access_level_id = %id, applications = propagated, "Access level updated");
        Ok(updated)
    }

    /// Remove a level from the catalog and from every application, then
    /// purge the grants at that level.
    pub fn delete_access_level(&mut self, id: &AccessLevelId) -> Result<Removal<AccessLevel>> {
        let index = self
            .data
            .access_levels
            .iter()
            .position(|level| &level.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::AccessLevel.as_str(), id.as_str()))?;

        let record = self.data.access_levels.remove(index);
        for app in self.data.applications.iter_mut() {
            app.access_levels.retain(|level| &level.id != id);
        }
        let cascaded_grants = self.purge_grants("access_level", |grant| &grant.access_level_id == id);
        Ok(Removal {
            record,
            cascaded_grants,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grants
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant a user access to an application.
    ///
    /// The access level must be one the application offers and every custom
    /// permission must be one of the application's custom permissions.
    pub fn grant_access(&mut self, request: GrantRequest) -> Result<UserAccess> {
        validated(EntityKind::UserAccess, &request)?;

        let errors = self.check_grant_references(
            &request.user_id,
            &request.application_id,
            &request.access_level_id,
            &request.custom_permissions,
        );
        rejected(EntityKind::UserAccess, errors)?;

        let grant = UserAccess {
            id: AccessId::new(self.ids.next_id(EntityKind::UserAccess)?),
            user_id: request.user_id,
            application_id: request.application_id,
            access_level_id: request.access_level_id,
            granted_by: request
                .granted_by
                .unwrap_or_else(|| self.default_granted_by.clone()),
            granted_at: Utc::now(),
            is_active: request.is_active,
            expires_at: request.expires_at,
            custom_permissions: request.custom_permissions,
        };

        debug!(
            access_id = %grant.id,
            user_id = %grant.user_id,
            application_id = %grant.application_id,
            access_level_id = %grant.access_level_id,
            "Access granted"
        );
        self.data.user_access.push(grant.clone());
        Ok(grant)
    }

    /// Update a grant. The patched grant is checked like a new one.
    pub fn update_access(&mut self, id: &AccessId, patch: AccessPatch) -> Result<UserAccess> {
        let index = self
            .data
            .user_access
            .iter()
            .position(|grant| &grant.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::UserAccess.as_str(), id.as_str()))?;
        validated(EntityKind::UserAccess, &patch)?;

        let mut next = self.data.user_access[index].clone();
        next.apply_patch(patch);

        let errors = self.check_grant_references(
            &next.user_id,
            &next.application_id,
            &next.access_level_id,
            &next.custom_permissions,
        );
        rejected(EntityKind::UserAccess, errors)?;

        debug!(access_id = %id, is_active = next.is_active, "Access updated");
        self.data.user_access[index] = next.clone();
        Ok(next)
    }

    /// Permanently remove a grant.
    pub fn revoke_access(&mut self, id: &AccessId) -> Result<UserAccess> {
        let index = self
            .data
            .user_access
            .iter()
            .position(|grant| &grant.id == id)
            .ok_or_else(|| WardenError::not_found(EntityKind::UserAccess.as_str(), id.as_str()))?;

        let grant = self.data.user_access.remove(index);
        debug!(access_id = %id, user_id = %grant.user_id, "Access revoked");
        Ok(grant)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn purge_grants<F>(&mut self, cause: &'static str, matches: F) -> Vec<AccessId>
    where
        F: Fn(&UserAccess) -> bool,
    {
        let mut removed = Vec::new();
        self.data.user_access.retain(|grant| {
            if matches(grant) {
                removed.push(grant.id.clone());
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            counter!(metric_names::CASCADE_DELETED_TOTAL, "cause" => cause)
                .increment(removed.len() as u64);
            info!(cause = cause, grants = removed.len(), "Cascade removed grants");
        }
        removed
    }

    fn global_levels(&self) -> Vec<AccessLevel> {
        self.data
            .access_levels
            .iter()
            .filter(|level| !level.is_custom)
            .cloned()
            .collect()
    }

    fn resolve_levels(&self, ids: &[AccessLevelId], errors: &mut ValidationErrors) -> Vec<AccessLevel> {
        let mut levels = Vec::with_capacity(ids.len());
        for id in ids {
            match self.access_level(id) {
                Some(level) => levels.push(level.clone()),
                None => errors.add_unknown_reference(
                    "accessLevels",
                    EntityKind::AccessLevel.as_str(),
                    id.as_str(),
                ),
            }
        }
        levels
    }

    fn resolve_permissions(
        &self,
        ids: &[PermissionId],
        field: &str,
        errors: &mut ValidationErrors,
    ) -> Vec<Permission> {
        let mut permissions = Vec::with_capacity(ids.len());
        for id in ids {
            match self.permission(id) {
                Some(perm) => permissions.push(perm.clone()),
                None => errors.add_unknown_reference(field, EntityKind::Permission.as_str(), id.as_str()),
            }
        }
        permissions
    }

    fn check_permissions_exist(&self, ids: &[PermissionId], field: &str, errors: &mut ValidationErrors) {
        let known: Vec<PermissionId> = self.data.permissions.iter().map(|p| p.id.clone()).collect();
        if let Some(error) = AllOf::new(known).validate(&ids.to_vec()) {
            errors.add(field, error);
        }
    }

    fn check_grants_still_fit(
        &self,
        app_id: &ApplicationId,
        levels: &[AccessLevel],
        customs: &[Permission],
        errors: &mut ValidationErrors,
    ) {
        for grant in self.data.user_access.iter().filter(|g| &g.application_id == app_id) {
            if !levels.iter().any(|level| level.id == grant.access_level_id) {
                errors.add_with_message(
                    "accessLevels",
                    ValidationErrorKind::Custom {
                        code: "access_level_in_use".into(),
                    },
                    format!(
                        "access level {} is still used by grant {}",
                        grant.access_level_id, grant.id
                    ),
                );
            }
            for perm in &grant.custom_permissions {
                if !customs.iter().any(|p| &p.id == perm) {
                    errors.add_with_message(
                        "customPermissions",
                        ValidationErrorKind::Custom {
                            code: "permission_in_use".into(),
                        },
                        format!("permission {} is still used by grant {}", perm, grant.id),
                    );
                }
            }
        }
    }

    fn check_grant_references(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
        access_level_id: &AccessLevelId,
        custom_permissions: &[PermissionId],
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.user(user_id).is_none() {
            errors.add_unknown_reference("userId", EntityKind::User.as_str(), user_id.as_str());
        }

        match self.application(application_id) {
            None => {
                errors.add_unknown_reference(
                    "applicationId",
                    EntityKind::Application.as_str(),
                    application_id.as_str(),
                );
                if self.access_level(access_level_id).is_none() {
                    errors.add_unknown_reference(
                        "accessLevelId",
                        EntityKind::AccessLevel.as_str(),
                        access_level_id.as_str(),
                    );
                }
            }
            Some(app) => {
                if let Some(error) = OneOf::new(app.access_level_ids()).validate(access_level_id) {
                    errors.add("accessLevelId", error);
                }
                if let Some(error) =
                    AllOf::new(app.custom_permission_ids()).validate(&custom_permissions.to_vec())
                {
                    errors.add("customPermissions", error);
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn store() -> EntityStore {
        EntityStore::builtin().unwrap()
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.into(),
            email: format!("{}@company.com", name.to_lowercase()),
            role: "Analyst".into(),
            department: None,
            is_active: true,
        }
    }

    #[test]
    fn test_create_user_assigns_next_id() {
        let mut store = store();
        let user = store.create_user(new_user("Dana")).unwrap();
        assert_eq!(user.id.as_str(), "5");
        assert!(user.last_login.is_none());
        assert_eq!(store.users().len(), 5);
    }

    #[test]
    fn test_create_user_rejects_blank_fields() {
        let mut store = store();
        let err = store
            .create_user(NewUser {
                name: " ".into(),
                ..new_user("x")
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(store.users().len(), 4);
    }

    #[test]
    fn test_update_missing_user_is_not_found() {
        let mut store = store();
        let err = store.update_user(&"99".into(), UserPatch::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }

    #[test]
    fn test_delete_user_cascades() {
        let mut store = store();
        let removal = store.delete_user(&"1".into()).unwrap();
        assert_eq!(removal.record.name, "John Doe");
        assert_eq!(removal.cascaded_grants.len(), 4);
        assert!(store.user_access().iter().all(|g| g.user_id.as_str() != "1"));
        assert!(integrity::check(store.dataset()).is_ok());
    }

    #[test]
    fn test_new_application_defaults_to_global_levels() {
        let mut store = store();
        let app = store
            .create_application(NewApplication {
                name: "Wiki".into(),
                category: "Productivity".into(),
                is_active: true,
                ..Default::default()
            })
            .unwrap();
        let names: Vec<&str> = app.access_levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Viewer", "Editor", "Manager", "Administrator"]);
        assert!(app.custom_permissions.is_empty());
    }

    #[test]
    fn test_new_application_with_unknown_permission() {
        let mut store = store();
        let err = store
            .create_application(NewApplication {
                name: "Wiki".into(),
                category: "Productivity".into(),
                custom_permissions: vec!["999".into()],
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.applications().len(), 5);
    }

    #[test]
    fn test_narrowing_application_in_use_is_rejected() {
        let mut store = store();
        // Customer Portal grants use Editor and Manager
        let err = store
            .update_application(
                &"1".into(),
                ApplicationPatch {
                    access_levels: Some(vec!["1".into()]),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.application(&"1".into()).unwrap().access_levels.len(), 4);
    }

    #[test]
    fn test_access_level_update_propagates_to_applications() {
        let mut store = store();
        store
            .update_access_level(
                &"2".into(),
                AccessLevelPatch {
                    name: Some("Contributor".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        for app_id in ["1", "2", "3"] {
            let app = store.application(&app_id.into()).unwrap();
            assert_eq!(app.access_level(&"2".into()).unwrap().name, "Contributor");
        }
    }

    #[test]
    fn test_delete_access_level_strips_applications_and_grants() {
        let mut store = store();
        let removal = store.delete_access_level(&"9".into()).unwrap();
        assert_eq!(removal.cascaded_grants.len(), 2);
        assert!(!store.application(&"5".into()).unwrap().has_access_level(&"9".into()));
        assert!(store.access_level(&"9".into()).is_none());
    }

    #[test]
    fn test_create_access_level_for_application() {
        let mut store = store();
        let level = store
            .create_access_level(NewAccessLevel {
                name: "Auditor".into(),
                permissions: vec!["1".into()],
                is_custom: true,
                application_id: Some("3".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(level.id.as_str(), "13");
        assert!(store.application(&"3".into()).unwrap().has_access_level(&level.id));
    }

    #[test]
    fn test_grant_with_foreign_level_fails() {
        let mut store = store();
        // Level 5 exists, but only GitHub offers it
        let err = store.grant_access(GrantRequest::new("2", "1", "5")).unwrap_err();
        assert!(err.is_validation());
        let fields = err.details().field_errors.as_ref().unwrap();
        assert!(fields.has_errors("accessLevelId"));
        assert_eq!(store.user_access().len(), 12);
    }

    #[test]
    fn test_grant_uses_default_actor() {
        let mut store = store();
        let grant = store.grant_access(GrantRequest::new("4", "1", "1")).unwrap();
        assert_eq!(grant.granted_by, "admin@company.com");
        assert_eq!(grant.id.as_str(), "13");
    }

    #[test]
    fn test_update_access_rechecks_references() {
        let mut store = store();
        let err = store
            .update_access(
                &"1".into(),
                AccessPatch {
                    custom_permissions: Some(vec!["6".into()]),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.grant(&"1".into()).unwrap().custom_permissions.is_empty());
    }

    #[test]
    fn test_revoke_missing_grant_is_not_found() {
        let mut store = store();
        assert!(store.revoke_access(&"99".into()).unwrap_err().is_not_found());
        assert!(store.revoke_access(&"3".into()).is_ok());
        assert!(store.grant(&"3".into()).is_none());
    }
}
