//! The built-in permission catalog.
//!
//! Ids 1-6 are general purpose (6 is the HR salary permission), 7-42 cover
//! GitHub and 43-114 cover MongoDB. Each resource of the two platform
//! blocks has a read, write and admin entry, in that order.

use std::ops::RangeInclusive;

use crate::models::{Permission, PermissionAction};

use PermissionAction::{Admin, Delete, Read, Write};

/// Permission ids of the GitHub block.
pub const GITHUB_PERMISSIONS: RangeInclusive<u32> = 7..=42;

/// Permission ids of the MongoDB block.
pub const MONGODB_PERMISSIONS: RangeInclusive<u32> = 43..=114;

/// The salary permission only the HR system exposes.
pub const SALARY_PERMISSION: u32 = 6;

type PermissionRow = (u32, &'static str, &'static str, &'static str, PermissionAction);

const PERMISSION_TABLE: &[PermissionRow] = &[
    (1, "View Dashboard", "Can view application dashboard", "dashboard", Read),
    (2, "Edit Settings", "Can modify application settings", "settings", Write),
    (3, "Delete Records", "Can delete application records", "records", Delete),
    (4, "Admin Access", "Full administrative access", "all", Admin),
    (5, "Export Data", "Can export application data", "data", Read),
    (6, "View Salary Info", "Can view employee salary information", "salary", Read),
    (7, "Repository Read", "Can view repository contents and history", "repository", Read),
    (8, "Repository Write", "Can push commits and create branches", "repository", Write),
    (9, "Repository Admin", "Can manage repository settings and access", "repository", Admin),
    (10, "Issue Read", "Can view issues and pull requests", "issues", Read),
    (11, "Issue Write", "Can create and comment on issues", "issues", Write),
    (12, "Issue Admin", "Can manage issue labels and milestones", "issues", Admin),
    (13, "Pull Request Read", "Can view pull request details", "pull_requests", Read),
    (14, "Pull Request Write", "Can create and review pull requests", "pull_requests", Write),
    (15, "Pull Request Admin", "Can merge and manage pull requests", "pull_requests", Admin),
    (16, "Organization Read", "Can view organization information", "organization", Read),
    (17, "Organization Write", "Can manage team memberships", "organization", Write),
    (18, "Organization Admin", "Can manage organization settings", "organization", Admin),
    (19, "Team Read", "Can view team information", "team", Read),
    (20, "Team Write", "Can manage team members", "team", Write),
    (21, "Team Admin", "Can manage team settings and permissions", "team", Admin),
    (22, "Security Read", "Can view security advisories", "security", Read),
    (23, "Security Write", "Can create security advisories", "security", Write),
    (24, "Security Admin", "Can manage security policies", "security", Admin),
    (25, "Actions Read", "Can view GitHub Actions workflows", "actions", Read),
    (26, "Actions Write", "Can trigger and manage workflows", "actions", Write),
    (27, "Actions Admin", "Can manage Actions settings and secrets", "actions", Admin),
    (28, "Packages Read", "Can view packages and containers", "packages", Read),
    (29, "Packages Write", "Can publish packages and containers", "packages", Write),
    (30, "Packages Admin", "Can manage package settings and access", "packages", Admin),
    (31, "Wiki Read", "Can view repository wiki", "wiki", Read),
    (32, "Wiki Write", "Can edit repository wiki", "wiki", Write),
    (33, "Wiki Admin", "Can manage wiki settings", "wiki", Admin),
    (34, "Discussions Read", "Can view repository discussions", "discussions", Read),
    (35, "Discussions Write", "Can participate in discussions", "discussions", Write),
    (36, "Discussions Admin", "Can manage discussion categories", "discussions", Admin),
    (37, "Projects Read", "Can view project boards", "projects", Read),
    (38, "Projects Write", "Can update project boards", "projects", Write),
    (39, "Projects Admin", "Can manage project settings", "projects", Admin),
    (40, "Environments Read", "Can view deployment environments", "environments", Read),
    (41, "Environments Write", "Can deploy to environments", "environments", Write),
    (42, "Environments Admin", "Can manage environment settings", "environments", Admin),
    (43, "Database Read", "Can read database information and statistics", "database", Read),
    (44, "Database Write", "Can create and modify databases", "database", Write),
    (45, "Database Admin", "Can manage database settings and access", "database", Admin),
    (46, "Collection Read", "Can read collection data and metadata", "collection", Read),
    (47, "Collection Write", "Can insert, update, and delete documents", "collection", Write),
    (48, "Collection Admin", "Can manage collection settings and indexes", "collection", Admin),
    (49, "Document Read", "Can read individual documents", "document", Read),
    (50, "Document Write", "Can create, update, and delete documents", "document", Write),
    (51, "Document Admin", "Can manage document validation and schemas", "document", Admin),
    (52, "Index Read", "Can view index information", "index", Read),
    (53, "Index Write", "Can create and drop indexes", "index", Write),
    (54, "Index Admin", "Can manage index settings and optimization", "index", Admin),
    (55, "Query Read", "Can execute read queries", "query", Read),
    (56, "Query Write", "Can execute write operations", "query", Write),
    (57, "Query Admin", "Can manage query performance and optimization", "query", Admin),
    (58, "Aggregation Read", "Can execute aggregation pipelines", "aggregation", Read),
    (59, "Aggregation Write", "Can create and manage aggregation pipelines", "aggregation", Write),
    (60, "Aggregation Admin", "Can manage aggregation settings and optimization", "aggregation", Admin),
    (61, "User Management Read", "Can view user accounts and roles", "user_management", Read),
    (62, "User Management Write", "Can create and modify user accounts", "user_management", Write),
    (63, "User Management Admin", "Can manage user authentication and authorization", "user_management", Admin),
    (64, "Role Management Read", "Can view role definitions and permissions", "role_management", Read),
    (65, "Role Management Write", "Can create and modify roles", "role_management", Write),
    (66, "Role Management Admin", "Can manage role hierarchies and inheritance", "role_management", Admin),
    (67, "Authentication Read", "Can view authentication settings", "authentication", Read),
    (68, "Authentication Write", "Can modify authentication methods", "authentication", Write),
    (69, "Authentication Admin", "Can manage authentication policies and security", "authentication", Admin),
    (70, "Authorization Read", "Can view authorization policies", "authorization", Read),
    (71, "Authorization Write", "Can modify authorization rules", "authorization", Write),
    (72, "Authorization Admin", "Can manage authorization policies and access control", "authorization", Admin),
    (73, "Backup Read", "Can view backup information and status", "backup", Read),
    (74, "Backup Write", "Can initiate and manage backups", "backup", Write),
    (75, "Backup Admin", "Can manage backup policies and schedules", "backup", Admin),
    (76, "Restore Read", "Can view restore information and history", "restore", Read),
    (77, "Restore Write", "Can initiate restore operations", "restore", Write),
    (78, "Restore Admin", "Can manage restore policies and procedures", "restore", Admin),
    (79, "Replication Read", "Can view replication status and configuration", "replication", Read),
    (80, "Replication Write", "Can modify replication settings", "replication", Write),
    (81, "Replication Admin", "Can manage replication topology and failover", "replication", Admin),
    (82, "Sharding Read", "Can view sharding configuration and status", "sharding", Read),
    (83, "Sharding Write", "Can modify sharding settings", "sharding", Write),
    (84, "Sharding Admin", "Can manage sharding topology and balancing", "sharding", Admin),
    (85, "Monitoring Read", "Can view monitoring data and metrics", "monitoring", Read),
    (86, "Monitoring Write", "Can configure monitoring and alerting", "monitoring", Write),
    (87, "Monitoring Admin", "Can manage monitoring policies and thresholds", "monitoring", Admin),
    (88, "Logs Read", "Can view system logs and audit trails", "logs", Read),
    (89, "Logs Write", "Can configure logging settings", "logs", Write),
    (90, "Logs Admin", "Can manage log retention and archival policies", "logs", Admin),
    (91, "Performance Read", "Can view performance metrics and statistics", "performance", Read),
    (92, "Performance Write", "Can configure performance tuning parameters", "performance", Write),
    (93, "Performance Admin", "Can manage performance optimization and profiling", "performance", Admin),
    (94, "Security Read", "Can view security settings and policies", "security", Read),
    (95, "Security Write", "Can modify security configurations", "security", Write),
    (96, "Security Admin", "Can manage security policies and compliance", "security", Admin),
    (97, "Network Read", "Can view network configuration and connections", "network", Read),
    (98, "Network Write", "Can modify network settings", "network", Write),
    (99, "Network Admin", "Can manage network security and firewall rules", "network", Admin),
    (100, "Storage Read", "Can view storage configuration and usage", "storage", Read),
    (101, "Storage Write", "Can modify storage settings", "storage", Write),
    (102, "Storage Admin", "Can manage storage allocation and optimization", "storage", Admin),
    (103, "Cluster Read", "Can view cluster configuration and status", "cluster", Read),
    (104, "Cluster Write", "Can modify cluster settings", "cluster", Write),
    (105, "Cluster Admin", "Can manage cluster topology and scaling", "cluster", Admin),
    (106, "Schema Read", "Can view data schemas and validation rules", "schema", Read),
    (107, "Schema Write", "Can modify data schemas and validation", "schema", Write),
    (108, "Schema Admin", "Can manage schema evolution and migration", "schema", Admin),
    (109, "Migration Read", "Can view migration status and history", "migration", Read),
    (110, "Migration Write", "Can initiate and manage migrations", "migration", Write),
    (111, "Migration Admin", "Can manage migration policies and rollback procedures", "migration", Admin),
    (112, "Compliance Read", "Can view compliance policies and audit reports", "compliance", Read),
    (113, "Compliance Write", "Can modify compliance configurations", "compliance", Write),
    (114, "Compliance Admin", "Can manage compliance policies and reporting", "compliance", Admin),
];

/// Every permission of the built-in catalog, ordered by id.
pub fn builtin_permissions() -> Vec<Permission> {
    PERMISSION_TABLE
        .iter()
        .map(|&(id, name, description, resource, action)| {
            Permission::new(id.to_string(), name, description, resource, action)
        })
        .collect()
}

/// Ids of the built-in catalog whose action is `action`, within `range`.
pub fn ids_with_action(range: RangeInclusive<u32>, action: PermissionAction) -> Vec<u32> {
    PERMISSION_TABLE
        .iter()
        .filter(|row| range.contains(&row.0) && row.4 == action)
        .map(|row| row.0)
        .collect()
}
