//! Predefined access levels.
//!
//! | Level                    | Scope    | Permissions                                |
//! |--------------------------|----------|--------------------------------------------|
//! | Viewer                   | global   | dashboard, export                          |
//! | Editor                   | global   | Viewer + settings                          |
//! | Manager                  | global   | Editor + delete records                    |
//! | Administrator            | global   | everything                                 |
//! | GitHub Viewer            | GitHub   | every GitHub read                          |
//! | GitHub Contributor       | GitHub   | reads + code, issue and collaboration writes |
//! | GitHub Maintainer        | GitHub   | everything except org, team and security admin |
//! | GitHub Administrator     | GitHub   | everything except salary                   |
//! | MongoDB Viewer           | MongoDB  | every MongoDB read                         |
//! | MongoDB Developer        | MongoDB  | reads + data, index, query and schema writes |
//! | MongoDB Administrator    | MongoDB  | the whole MongoDB block                    |
//! | MongoDB Super Admin      | MongoDB  | everything except salary                   |

use super::permissions::{ids_with_action, MONGODB_PERMISSIONS, GITHUB_PERMISSIONS, SALARY_PERMISSION};
use crate::models::{AccessLevel, PermissionAction, PermissionId};

/// Highest permission id of the built-in catalog.
const LAST_PERMISSION: u32 = 114;

/// Predefined access level templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedLevel {
    Viewer,
    Editor,
    Manager,
    Administrator,
    GitHubViewer,
    GitHubContributor,
    GitHubMaintainer,
    GitHubAdministrator,
    MongoViewer,
    MongoDeveloper,
    MongoAdministrator,
    MongoSuperAdmin,
}

impl PredefinedLevel {
    /// Every predefined level, in catalog order.
    pub const ALL: [PredefinedLevel; 12] = [
        Self::Viewer,
        Self::Editor,
        Self::Manager,
        Self::Administrator,
        Self::GitHubViewer,
        Self::GitHubContributor,
        Self::GitHubMaintainer,
        Self::GitHubAdministrator,
        Self::MongoViewer,
        Self::MongoDeveloper,
        Self::MongoAdministrator,
        Self::MongoSuperAdmin,
    ];

    pub const GLOBAL: [PredefinedLevel; 4] =
        [Self::Viewer, Self::Editor, Self::Manager, Self::Administrator];

    pub const GITHUB: [PredefinedLevel; 4] = [
        Self::GitHubViewer,
        Self::GitHubContributor,
        Self::GitHubMaintainer,
        Self::GitHubAdministrator,
    ];

    pub const MONGODB: [PredefinedLevel; 4] = [
        Self::MongoViewer,
        Self::MongoDeveloper,
        Self::MongoAdministrator,
        Self::MongoSuperAdmin,
    ];

    /// Get the level identifier.
    pub fn id(&self) -> u32 {
        match self {
            Self::Viewer => 1,
            Self::Editor => 2,
            Self::Manager => 3,
            Self::Administrator => 4,
            Self::GitHubViewer => 5,
            Self::GitHubContributor => 6,
            Self::GitHubMaintainer => 7,
            Self::GitHubAdministrator => 8,
            Self::MongoViewer => 9,
            Self::MongoDeveloper => 10,
            Self::MongoAdministrator => 11,
            Self::MongoSuperAdmin => 12,
        }
    }

    /// Get the human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Editor => "Editor",
            Self::Manager => "Manager",
            Self::Administrator => "Administrator",
            Self::GitHubViewer => "GitHub Viewer",
            Self::GitHubContributor => "GitHub Contributor",
            Self::GitHubMaintainer => "GitHub Maintainer",
            Self::GitHubAdministrator => "GitHub Administrator",
            Self::MongoViewer => "MongoDB Viewer",
            Self::MongoDeveloper => "MongoDB Developer",
            Self::MongoAdministrator => "MongoDB Administrator",
            Self::MongoSuperAdmin => "MongoDB Super Admin",
        }
    }

    /// Get the description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Viewer => "Basic read-only access",
            Self::Editor => "Can view and edit data",
            Self::Manager => "Full access except admin functions",
            Self::Administrator => "Full access to all features",
            Self::GitHubViewer => "Read-only access to repositories and issues",
            Self::GitHubContributor => "Can contribute code and participate in discussions",
            Self::GitHubMaintainer => "Can manage repositories and moderate content",
            Self::GitHubAdministrator => "Full access to all GitHub features and settings",
            Self::MongoViewer => "Read-only access to databases and collections",
            Self::MongoDeveloper => "Can read and write data, create indexes and queries",
            Self::MongoAdministrator => "Can manage databases, users, security, and performance",
            Self::MongoSuperAdmin => "Full access to all MongoDB features and system administration",
        }
    }

    /// Global levels are shared by every application.
    pub fn is_custom(&self) -> bool {
        !Self::GLOBAL.contains(self)
    }

    /// Permission ids bundled by this level.
    pub fn permission_ids(&self) -> Vec<u32> {
        match self {
            Self::Viewer => vec![1, 5],
            Self::Editor => vec![1, 2, 5],
            Self::Manager => vec![1, 2, 3, 5],
            Self::Administrator => (1..=LAST_PERMISSION).collect(),
            Self::GitHubViewer => ids_with_action(GITHUB_PERMISSIONS, PermissionAction::Read),
            Self::GitHubContributor => vec![
                7, 8, 10, 11, 13, 14, 16, 19, 22, 25, 28, 31, 32, 34, 35, 37, 38, 40, 41,
            ],
            Self::GitHubMaintainer => vec![
                7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 19, 20, 22, 23, 25, 26, 28, 29, 31, 32,
                33, 34, 35, 36, 37, 38, 39, 40, 41, 42,
            ],
            Self::GitHubAdministrator | Self::MongoSuperAdmin => (1..=LAST_PERMISSION)
                .filter(|id| *id != SALARY_PERMISSION)
                .collect(),
            Self::MongoViewer => ids_with_action(MONGODB_PERMISSIONS, PermissionAction::Read),
            Self::MongoDeveloper => vec![
                43, 44, 46, 47, 49, 50, 52, 53, 55, 56, 58, 59, 61, 64, 67, 70, 73, 76, 79, 82,
                85, 88, 91, 94, 97, 100, 103, 106, 107, 109, 110, 112,
            ],
            Self::MongoAdministrator => MONGODB_PERMISSIONS.collect(),
        }
    }

    /// Build the access level entity.
    pub fn to_access_level(&self) -> AccessLevel {
        AccessLevel {
            id: self.id().to_string().into(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            permissions: self
                .permission_ids()
                .into_iter()
                .map(|id| PermissionId::new(id.to_string()))
                .collect(),
            is_custom: self.is_custom(),
        }
    }
}

/// Build a list of access levels from templates.
pub fn levels(templates: &[PredefinedLevel]) -> Vec<AccessLevel> {
    templates.iter().map(PredefinedLevel::to_access_level).collect()
}

/// Every built-in access level, ordered by id.
pub fn builtin_access_levels() -> Vec<AccessLevel> {
    levels(&PredefinedLevel::ALL)
}
