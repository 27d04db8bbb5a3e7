//! The built-in sample dataset: four users, five applications and twelve
//! grants across them.

use chrono::{DateTime, NaiveDate, Utc};

use super::access_levels::{levels, PredefinedLevel};
use super::permissions::{builtin_permissions, GITHUB_PERMISSIONS, MONGODB_PERMISSIONS, SALARY_PERMISSION};
use crate::models::{Application, Permission, User, UserAccess};

/// Actor recorded on grants issued by the central administrator.
pub const DEFAULT_GRANTED_BY: &str = "admin@company.com";

/// Midnight UTC of a calendar date.
pub(crate) fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

type UserRow = (u32, &'static str, &'static str, &'static str, &'static str, bool, (i32, u32, u32), (i32, u32, u32));

const USER_TABLE: &[UserRow] = &[
    (1, "John Doe", "john.doe@company.com", "Software Engineer", "Engineering", true, (2023, 1, 15), (2024, 1, 20)),
    (2, "Jane Smith", "jane.smith@company.com", "Product Manager", "Product", true, (2023, 2, 20), (2024, 1, 19)),
    (3, "Bob Johnson", "bob.johnson@company.com", "DevOps Engineer", "Engineering", true, (2023, 3, 10), (2024, 1, 18)),
    (4, "Alice Brown", "alice.brown@company.com", "UX Designer", "Design", false, (2023, 4, 5), (2024, 1, 10)),
];

pub fn sample_users() -> Vec<User> {
    USER_TABLE
        .iter()
        .map(|&(id, name, email, role, department, is_active, created, login)| User {
            id: id.to_string().into(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            department: Some(department.to_string()),
            is_active,
            created_at: day(created.0, created.1, created.2),
            last_login: Some(day(login.0, login.1, login.2)),
        })
        .collect()
}

fn pick(catalog: &[Permission], ids: impl IntoIterator<Item = u32>) -> Vec<Permission> {
    ids.into_iter()
        .filter_map(|id| catalog.iter().find(|perm| perm.id.as_number() == Some(id as u64)))
        .cloned()
        .collect()
}

pub fn sample_applications() -> Vec<Application> {
    let catalog = builtin_permissions();
    let app = |id: u32,
               name: &str,
               description: &str,
               url: &str,
               category: &str,
               created_at: DateTime<Utc>,
               templates: &[PredefinedLevel],
               custom: Vec<Permission>| Application {
        id: id.to_string().into(),
        name: name.to_string(),
        description: description.to_string(),
        url: Some(url.to_string()),
        category: category.to_string(),
        is_active: true,
        created_at,
        access_levels: levels(templates),
        custom_permissions: custom,
    };

    vec![
        app(
            1,
            "Customer Portal",
            "Customer self-service portal for account management",
            "https://portal.company.com",
            "Customer Service",
            day(2023, 1, 1),
            &PredefinedLevel::GLOBAL[..],
            Vec::new(),
        ),
        app(
            2,
            "Internal HR System",
            "Human resources management system",
            "https://hr.company.com",
            "Human Resources",
            day(2023, 2, 1),
            &PredefinedLevel::GLOBAL[..],
            pick(&catalog, [SALARY_PERMISSION]),
        ),
        app(
            3,
            "Project Management Tool",
            "Team collaboration and project tracking",
            "https://projects.company.com",
            "Productivity",
            day(2023, 3, 1),
            &PredefinedLevel::GLOBAL[..],
            Vec::new(),
        ),
        app(
            4,
            "GitHub",
            "Source code management and collaboration platform",
            "https://github.com/company",
            "Development",
            day(2023, 1, 1),
            &PredefinedLevel::GITHUB[..],
            pick(&catalog, GITHUB_PERMISSIONS),
        ),
        app(
            5,
            "MongoDB",
            "NoSQL database management and administration platform",
            "mongodb://localhost:27017",
            "Database",
            day(2023, 1, 1),
            &PredefinedLevel::MONGODB[..],
            pick(&catalog, MONGODB_PERMISSIONS),
        ),
    ]
}

type GrantRow = (u32, u32, u32, u32, &'static str, (i32, u32, u32), &'static [u32]);

const GRANT_TABLE: &[GrantRow] = &[
    // (id, user, application, access level, granted by, granted at, custom permissions)
    (1, 1, 1, 2, DEFAULT_GRANTED_BY, (2023, 1, 20), &[]),
    (2, 2, 1, 3, DEFAULT_GRANTED_BY, (2023, 2, 25), &[]),
    (3, 1, 2, 1, "hr@company.com", (2023, 2, 10), &[SALARY_PERMISSION]),
    (4, 3, 3, 4, DEFAULT_GRANTED_BY, (2023, 3, 15), &[]),
    (5, 1, 4, 6, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
    (6, 2, 4, 5, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
    (7, 3, 4, 7, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
    (8, 4, 4, 5, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
    (9, 1, 5, 10, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
    (10, 2, 5, 9, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
    (11, 3, 5, 11, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
    (12, 4, 5, 9, DEFAULT_GRANTED_BY, (2023, 1, 1), &[]),
];

pub fn sample_grants() -> Vec<UserAccess> {
    GRANT_TABLE
        .iter()
        .map(|&(id, user, application, level, granted_by, at, custom)| UserAccess {
            id: id.to_string().into(),
            user_id: user.to_string().into(),
            application_id: application.to_string().into(),
            access_level_id: level.to_string().into(),
            granted_by: granted_by.to_string(),
            granted_at: day(at.0, at.1, at.2),
            is_active: true,
            expires_at: None,
            custom_permissions: custom.iter().map(|id| id.to_string().into()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_is_midnight_utc() {
        assert_eq!(day(2023, 1, 15).to_rfc3339(), "2023-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_sample_sizes() {
        assert_eq!(sample_users().len(), 4);
        assert_eq!(sample_applications().len(), 5);
        assert_eq!(sample_grants().len(), 12);
    }

    #[test]
    fn test_only_alice_is_inactive() {
        let inactive: Vec<String> = sample_users()
            .into_iter()
            .filter(|user| !user.is_active)
            .map(|user| user.name)
            .collect();
        assert_eq!(inactive, vec!["Alice Brown"]);
    }

    #[test]
    fn test_platform_apps_expose_their_blocks() {
        let apps = sample_applications();
        assert_eq!(apps[1].custom_permissions.len(), 1);
        assert_eq!(apps[1].custom_permissions[0].name, "View Salary Info");
        assert_eq!(apps[3].custom_permissions.len(), 36);
        assert_eq!(apps[4].custom_permissions.len(), 72);
        assert_eq!(apps[3].access_level_ids().len(), 4);
        assert_eq!(apps[3].access_levels[0].name, "GitHub Viewer");
    }

    #[test]
    fn test_hr_grant_carries_salary_permission() {
        let grants = sample_grants();
        assert_eq!(grants[2].granted_by, "hr@company.com");
        assert_eq!(grants[2].custom_permissions, vec![crate::models::PermissionId::from("6")]);
    }
}
