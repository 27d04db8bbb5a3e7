//! Access reports: active grants of one application grouped by access level.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use metrics::counter;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AccessQuery;
use crate::error::{Result, WardenError};
use crate::models::{AccessLevelId, ApplicationId, Permission, User};
use crate::telemetry::metric_names;

static WHITESPACE: OnceLock<Regex> = OnceLock::new();

// ═══════════════════════════════════════════════════════════════════════════════
// Report
// ═══════════════════════════════════════════════════════════════════════════════

/// Users holding one access level of the reported application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLevelUsage {
    pub access_level_id: AccessLevelId,
    pub access_level_name: String,
    pub user_count: usize,
    pub users: Vec<User>,
}

/// Point-in-time aggregation of an application's active grants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessReport {
    pub application_id: ApplicationId,
    pub application_name: String,
    /// Number of active grants on the application.
    pub total_users: usize,
    /// One entry per application access level, in the application's order.
    pub users_by_access_level: Vec<AccessLevelUsage>,
    pub custom_permissions: Vec<Permission>,
    pub report_generated_at: DateTime<Utc>,
}

impl AccessReport {
    /// Entry for a level, if the application offers it.
    pub fn level(&self, id: &AccessLevelId) -> Option<&AccessLevelUsage> {
        self.users_by_access_level
            .iter()
            .find(|usage| &usage.access_level_id == id)
    }

    /// Entry by level name.
    pub fn level_named(&self, name: &str) -> Option<&AccessLevelUsage> {
        self.users_by_access_level
            .iter()
            .find(|usage| usage.access_level_name == name)
    }

    /// Reduce to the serializable export document.
    pub fn to_export(&self) -> ReportExport {
        ReportExport {
            application_name: self.application_name.clone(),
            total_users: self.total_users,
            report_generated_at: self
                .report_generated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            users_by_access_level: self
                .users_by_access_level
                .iter()
                .map(|usage| ExportedLevel {
                    access_level: usage.access_level_name.clone(),
                    user_count: usage.user_count,
                    users: usage.users.iter().map(ExportedUser::from).collect(),
                })
                .collect(),
            custom_permissions: self
                .custom_permissions
                .iter()
                .map(ExportedPermission::from)
                .collect(),
        }
    }

    /// File name an exported copy of this report is saved under.
    pub fn export_file_name(&self) -> String {
        export_file_name(&self.application_name, self.report_generated_at.date_naive())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Export document
// ═══════════════════════════════════════════════════════════════════════════════

/// The durable shape a report is written out as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport {
    pub application_name: String,
    pub total_users: usize,
    pub report_generated_at: String,
    pub users_by_access_level: Vec<ExportedLevel>,
    pub custom_permissions: Vec<ExportedPermission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedLevel {
    pub access_level: String,
    pub user_count: usize,
    pub users: Vec<ExportedUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedUser {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
}

impl From<&User> for ExportedUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            department: user.department.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedPermission {
    pub name: String,
    pub description: String,
    pub resource: String,
    pub action: String,
}

impl From<&Permission> for ExportedPermission {
    fn from(perm: &Permission) -> Self {
        Self {
            name: perm.name.clone(),
            description: perm.description.clone(),
            resource: perm.resource.clone(),
            action: perm.action.as_str().to_string(),
        }
    }
}

/// `access-report-<application-name-slug>-<YYYY-MM-DD>.json`
pub fn export_file_name(application_name: &str, date: NaiveDate) -> String {
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    let slug = whitespace.replace_all(application_name, "-").to_lowercase();
    format!("access-report-{}-{}.json", slug, date.format("%Y-%m-%d"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Generation
// ═══════════════════════════════════════════════════════════════════════════════

impl<'a> AccessQuery<'a> {
    /// Build a fresh report for the application.
    ///
    /// Every access level of the application gets an entry, empty ones
    /// included. Grants whose user no longer resolves are left out.
    pub fn generate_access_report(&self, application_id: &ApplicationId) -> Result<AccessReport> {
        let store = self.store();
        let app = store
            .application(application_id)
            .ok_or_else(|| WardenError::report_unavailable(application_id.as_str()))?;

        let grants: Vec<_> = self
            .active_grants()
            .filter(|grant| &grant.application_id == application_id)
            .filter(|grant| store.user(&grant.user_id).is_some())
            .collect();

        let users_by_access_level: Vec<AccessLevelUsage> = app
            .access_levels
            .iter()
            .map(|level| {
                let users: Vec<User> = grants
                    .iter()
                    .filter(|grant| grant.access_level_id == level.id)
                    .filter_map(|grant| store.user(&grant.user_id))
                    .cloned()
                    .collect();
                AccessLevelUsage {
                    access_level_id: level.id.clone(),
                    access_level_name: level.name.clone(),
                    user_count: users.len(),
                    users,
                }
            })
            .collect();

        counter!(metric_names::REPORTS_GENERATED_TOTAL).increment(1);
        info!(
            application_id = %application_id,
            total_users = grants.len(),
            levels = users_by_access_level.len(),
            "Access report generated"
        );

        Ok(AccessReport {
            application_id: app.id.clone(),
            application_name: app.name.clone(),
            total_users: grants.len(),
            users_by_access_level,
            custom_permissions: app.custom_permissions.clone(),
            report_generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::store::EntityStore;

    #[test]
    fn test_customer_portal_report() {
        let store = EntityStore::builtin().unwrap();
        let report = store.query().generate_access_report(&"1".into()).unwrap();

        assert_eq!(report.total_users, 2);
        assert_eq!(report.users_by_access_level.len(), 4);
        assert_eq!(report.level_named("Viewer").unwrap().user_count, 0);
        assert_eq!(report.level_named("Editor").unwrap().users[0].name, "John Doe");
        assert_eq!(report.level_named("Manager").unwrap().users[0].name, "Jane Smith");
        assert_eq!(report.level_named("Administrator").unwrap().user_count, 0);
    }

    #[test]
    fn test_missing_application_is_unavailable() {
        let store = EntityStore::builtin().unwrap();
        let err = store.query().generate_access_report(&"42".into()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ReportUnavailable);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_export_shape() {
        let store = EntityStore::builtin().unwrap();
        let report = store.query().generate_access_report(&"2".into()).unwrap();
        let json = serde_json::to_value(report.to_export()).unwrap();

        assert_eq!(json["applicationName"], "Internal HR System");
        assert_eq!(json["totalUsers"], 1);
        assert_eq!(json["usersByAccessLevel"][0]["accessLevel"], "Viewer");
        assert_eq!(json["usersByAccessLevel"][0]["users"][0]["department"], "Engineering");
        assert_eq!(json["customPermissions"][0]["action"], "read");
        assert!(json["reportGeneratedAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_file_name("Project  Management Tool", date),
            "access-report-project-management-tool-2024-03-09.json"
        );
        assert_eq!(export_file_name("GitHub", date), "access-report-github-2024-03-09.json");
    }
}
