//! Dashboard and per-application usage counters.

use serde::Serialize;

use super::{AccessQuery, GrantDetails, GrantFilter};
use crate::error::{Result, WardenError};
use crate::models::{AccessLevelId, ApplicationId, EntityKind};

/// Registry-wide counters plus the most recent grants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_applications: usize,
    pub access_level_count: usize,
    pub active_grants: usize,
    /// Newest first.
    pub recent_grants: Vec<GrantDetails>,
}

/// Active grants of one access level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCount {
    pub access_level_id: AccessLevelId,
    pub access_level_name: String,
    pub grants: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub application_id: ApplicationId,
    pub total_users: usize,
    /// Levels with at least one active grant, in the application's order.
    pub usage: Vec<LevelCount>,
}

impl<'a> AccessQuery<'a> {
    pub fn dashboard_stats(&self, recent_limit: usize) -> DashboardStats {
        let store = self.store();

        let mut recent = self.list_grants(&GrantFilter::new());
        recent.sort_by(|a, b| b.grant.granted_at.cmp(&a.grant.granted_at));
        recent.truncate(recent_limit);

        DashboardStats {
            total_users: store.users().len(),
            active_applications: store.applications().iter().filter(|app| app.is_active).count(),
            access_level_count: store.access_levels().len(),
            active_grants: self.active_grants().count(),
            recent_grants: recent,
        }
    }

    pub fn application_stats(&self, application_id: &ApplicationId) -> Result<ApplicationStats> {
        let app = self.store().application(application_id).ok_or_else(|| {
            WardenError::not_found(EntityKind::Application.as_str(), application_id.as_str())
        })?;

        let grants: Vec<_> = self
            .active_grants()
            .filter(|grant| &grant.application_id == application_id)
            .collect();

        let usage = app
            .access_levels
            .iter()
            .map(|level| LevelCount {
                access_level_id: level.id.clone(),
                access_level_name: level.name.clone(),
                grants: grants
                    .iter()
                    .filter(|grant| grant.access_level_id == level.id)
                    .count(),
            })
            .filter(|count| count.grants > 0)
            .collect();

        Ok(ApplicationStats {
            application_id: app.id.clone(),
            total_users: grants.len(),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::GrantRequest;
    use crate::store::EntityStore;

    #[test]
    fn test_dashboard_on_sample_data() {
        let store = EntityStore::builtin().unwrap();
        let stats = store.query().dashboard_stats(5);
        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.active_applications, 5);
        assert_eq!(stats.access_level_count, 12);
        assert_eq!(stats.active_grants, 12);
        assert_eq!(stats.recent_grants.len(), 5);
        let ids: Vec<&str> = stats.recent_grants.iter().map(|d| d.grant.id.as_str()).collect();
        assert_eq!(&ids[..3], &["4", "2", "3"]);
    }

    #[test]
    fn test_new_grant_tops_recent_activity() {
        let mut store = EntityStore::builtin().unwrap();
        let grant = store.grant_access(GrantRequest::new("4", "3", "1")).unwrap();
        let stats = store.query().dashboard_stats(3);
        assert_eq!(stats.recent_grants.len(), 3);
        assert_eq!(stats.recent_grants[0].grant.id, grant.id);
    }

    #[test]
    fn test_application_stats_skip_empty_levels() {
        let store = EntityStore::builtin().unwrap();
        let stats = store.query().application_stats(&"5".into()).unwrap();
        assert_eq!(stats.total_users, 4);
        let counts: Vec<(&str, usize)> = stats
            .usage
            .iter()
            .map(|c| (c.access_level_name.as_str(), c.grants))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("MongoDB Viewer", 2),
                ("MongoDB Developer", 1),
                ("MongoDB Administrator", 1)
            ]
        );
    }

    #[test]
    fn test_application_stats_missing_app() {
        let store = EntityStore::builtin().unwrap();
        assert!(store.query().application_stats(&"9".into()).unwrap_err().is_not_found());
    }
}
