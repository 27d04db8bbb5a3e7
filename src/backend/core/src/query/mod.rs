//! Read-only projections over an entity store.
//!
//! Nothing here mutates state. Grants whose user, application or access
//! level no longer resolves are skipped rather than reported as errors.

pub mod report;
pub mod stats;

pub use report::{
    export_file_name, AccessLevelUsage, AccessReport, ExportedLevel, ExportedPermission,
    ExportedUser, ReportExport,
};
pub use stats::{ApplicationStats, DashboardStats, LevelCount};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WardenError};
use crate::models::{
    AccessLevel, Application, ApplicationId, EntityKind, Permission, PermissionId, User,
    UserAccess, UserId,
};
use crate::store::EntityStore;

// ═══════════════════════════════════════════════════════════════════════════════
// Filters and joined rows
// ═══════════════════════════════════════════════════════════════════════════════

/// Narrows [`AccessQuery::list_grants`]. An empty filter matches every
/// active grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl GrantFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn application(mut self, id: impl Into<ApplicationId>) -> Self {
        self.application_id = Some(id.into());
        self
    }

    pub fn user(mut self, id: impl Into<UserId>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    fn matches(&self, grant: &UserAccess) -> bool {
        self.application_id
            .as_ref()
            .map_or(true, |id| &grant.application_id == id)
            && self.user_id.as_ref().map_or(true, |id| &grant.user_id == id)
    }
}

/// A grant joined with the names of everything it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantDetails {
    #[serde(flatten)]
    pub grant: UserAccess,
    pub user_name: String,
    pub user_email: String,
    pub application_name: String,
    pub access_level_name: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Access Query
// ═══════════════════════════════════════════════════════════════════════════════

/// Query engine bound to one store state.
#[derive(Debug, Clone, Copy)]
pub struct AccessQuery<'a> {
    store: &'a EntityStore,
}

impl EntityStore {
    /// Queries against the current state.
    pub fn query(&self) -> AccessQuery<'_> {
        AccessQuery::new(self)
    }
}

impl<'a> AccessQuery<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a EntityStore {
        self.store
    }

    /// Active grants in storage order.
    pub(crate) fn active_grants(&self) -> impl Iterator<Item = &'a UserAccess> + 'a {
        self.store.user_access().iter().filter(|grant| grant.is_active)
    }

    /// Resolve a grant's application and access level. The level is looked
    /// up in the application's own list first, then in the catalog.
    fn level_of(&self, grant: &UserAccess) -> Option<(&'a Application, &'a AccessLevel)> {
        let app = self.store.application(&grant.application_id)?;
        let level = app
            .access_level(&grant.access_level_id)
            .or_else(|| self.store.access_level(&grant.access_level_id))?;
        Some((app, level))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Projections
    // ─────────────────────────────────────────────────────────────────────────

    /// Users holding an active grant on the application, one entry per
    /// grant, in grant order.
    pub fn users_for_application(&self, application_id: &ApplicationId) -> Vec<&'a User> {
        let users: Vec<&User> = self
            .active_grants()
            .filter(|grant| &grant.application_id == application_id)
            .filter_map(|grant| self.store.user(&grant.user_id))
            .collect();

        debug!(application_id = %application_id, users = users.len(), "Resolved application users");
        users
    }

    /// Applications the user holds an active grant on, one entry per grant,
    /// in grant order.
    pub fn applications_for_user(&self, user_id: &UserId) -> Vec<&'a Application> {
        let apps: Vec<&Application> = self
            .active_grants()
            .filter(|grant| &grant.user_id == user_id)
            .filter_map(|grant| self.store.application(&grant.application_id))
            .collect();

        debug!(user_id = %user_id, applications = apps.len(), "Resolved user applications");
        apps
    }

    /// Active grants matching the filter, joined with their references.
    pub fn list_grants(&self, filter: &GrantFilter) -> Vec<GrantDetails> {
        self.active_grants()
            .filter(|grant| filter.matches(grant))
            .filter_map(|grant| {
                let user = self.store.user(&grant.user_id)?;
                let (app, level) = self.level_of(grant)?;
                Some(GrantDetails {
                    grant: grant.clone(),
                    user_name: user.name.clone(),
                    user_email: user.email.clone(),
                    application_name: app.name.clone(),
                    access_level_name: level.name.clone(),
                })
            })
            .collect()
    }

    /// Number of active grants held by the user.
    pub fn active_grant_count(&self, user_id: &UserId) -> usize {
        self.active_grants()
            .filter(|grant| &grant.user_id == user_id)
            .count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permissions
    // ─────────────────────────────────────────────────────────────────────────

    /// Everything the user may do in the application: the permissions of
    /// the access level of each active grant plus the grant's custom
    /// permissions, first occurrence wins.
    pub fn effective_permissions(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<Vec<&'a Permission>> {
        if self.store.user(user_id).is_none() {
            return Err(WardenError::not_found(EntityKind::User.as_str(), user_id.as_str()));
        }
        if self.store.application(application_id).is_none() {
            return Err(WardenError::not_found(
                EntityKind::Application.as_str(),
                application_id.as_str(),
            ));
        }

        let mut seen: HashSet<&PermissionId> = HashSet::new();
        let mut permissions = Vec::new();

        let grants = self
            .active_grants()
            .filter(|grant| &grant.user_id == user_id && &grant.application_id == application_id);
        for grant in grants {
            let Some((app, level)) = self.level_of(grant) else {
                continue;
            };
            let ids = level.permissions.iter().chain(grant.custom_permissions.iter());
            for id in ids {
                let resolved = self
                    .store
                    .permission(id)
                    .or_else(|| app.custom_permission(id));
                if let Some(permission) = resolved {
                    if seen.insert(&permission.id) {
                        permissions.push(permission);
                    }
                }
            }
        }

        debug!(
            user_id = %user_id,
            application_id = %application_id,
            permissions = permissions.len(),
            "Resolved effective permissions"
        );
        Ok(permissions)
    }

    /// Whether any effective permission matches `resource` and `action`.
    pub fn has_permission(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
        resource: &str,
        action: &str,
    ) -> Result<bool> {
        Ok(self
            .effective_permissions(user_id, application_id)?
            .iter()
            .any(|perm| perm.resource == resource && perm.action.as_str() == action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessPatch, GrantRequest};

    fn store() -> EntityStore {
        EntityStore::builtin().unwrap()
    }

    fn names(users: &[&User]) -> Vec<String> {
        users.iter().map(|user| user.name.clone()).collect()
    }

    #[test]
    fn test_users_for_application_in_grant_order() {
        let store = store();
        let users = store.query().users_for_application(&"4".into());
        assert_eq!(
            names(&users),
            vec!["John Doe", "Jane Smith", "Bob Johnson", "Alice Brown"]
        );
    }

    #[test]
    fn test_inactive_grants_are_hidden() {
        let mut store = store();
        store
            .update_access(
                &"1".into(),
                AccessPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        let users = store.query().users_for_application(&"1".into());
        assert_eq!(names(&users), vec!["Jane Smith"]);
    }

    #[test]
    fn test_duplicate_grants_list_user_per_grant() {
        let mut store = store();
        store.grant_access(GrantRequest::new("2", "1", "1")).unwrap();
        let users = store.query().users_for_application(&"1".into());
        assert_eq!(names(&users), vec!["John Doe", "Jane Smith", "Jane Smith"]);

        store.grant_access(GrantRequest::new("1", "2", "1")).unwrap();
        let apps = store.query().applications_for_user(&"1".into());
        assert_eq!(
            apps.iter().filter(|app| app.name == "Internal HR System").count(),
            2
        );
    }

    #[test]
    fn test_applications_for_user() {
        let store = store();
        let apps: Vec<&str> = store
            .query()
            .applications_for_user(&"1".into())
            .iter()
            .map(|app| app.name.as_str())
            .collect();
        assert_eq!(
            apps,
            vec!["Customer Portal", "Internal HR System", "GitHub", "MongoDB"]
        );
        assert!(store.query().applications_for_user(&"99".into()).is_empty());
    }

    #[test]
    fn test_list_grants_filters() {
        let store = store();
        let query = store.query();
        assert_eq!(query.list_grants(&GrantFilter::new()).len(), 12);

        let github = query.list_grants(&GrantFilter::new().application("4"));
        assert_eq!(github.len(), 4);
        assert_eq!(github[0].access_level_name, "GitHub Contributor");

        let bob_on_mongo = query.list_grants(&GrantFilter::new().application("5").user("3"));
        assert_eq!(bob_on_mongo.len(), 1);
        assert_eq!(bob_on_mongo[0].access_level_name, "MongoDB Administrator");
    }

    #[test]
    fn test_active_grant_count() {
        let store = store();
        assert_eq!(store.query().active_grant_count(&"1".into()), 4);
        assert_eq!(store.query().active_grant_count(&"4".into()), 2);
        assert_eq!(store.query().active_grant_count(&"99".into()), 0);
    }

    #[test]
    fn test_effective_permissions_include_custom() {
        let store = store();
        let perms = store
            .query()
            .effective_permissions(&"1".into(), &"2".into())
            .unwrap();
        let keys: Vec<String> = perms.iter().map(|perm| perm.key()).collect();
        assert!(keys.contains(&"salary:read".to_string()));
        assert!(store
            .query()
            .has_permission(&"1".into(), &"2".into(), "salary", "read")
            .unwrap());
    }

    #[test]
    fn test_effective_permissions_missing_user() {
        let store = store();
        let err = store
            .query()
            .effective_permissions(&"99".into(), &"1".into())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
