#![allow(clippy::result_large_err)]
//! # Warden Core
//!
//! Access-control registry: which users may use which applications, at
//! what access level and with which extra permissions.
//!
//! ## Architecture
//!
//! - **Catalog**: built-in permissions, access levels and the sample dataset
//! - **Store**: owns users, applications, access levels, permissions and grants; cascades deletes
//! - **Command**: the closed set of state transitions
//! - **Query**: user/application projections, access reports, dashboard statistics
//! - **Registry**: snapshot-isolated handle with serialized writes
//! - **Validation**: field rules for command payloads
//! - **Telemetry**: structured logging and metric names

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod registry;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use error::{ErrorCode, ErrorDetails, ErrorSeverity, Result, WardenError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{PredefinedLevel, SeedData, SeedFormat};
    pub use crate::command::{transition, Command, CommandKind, CommandOutcome};
    pub use crate::config::Config;
    pub use crate::error::{ErrorCode, ErrorDetails, ErrorSeverity, Result, WardenError};
    pub use crate::models::{
        AccessId, AccessLevel, AccessLevelId, AccessLevelPatch, AccessPatch, Application,
        ApplicationId, ApplicationPatch, EntityKind, GrantRequest, NewAccessLevel,
        NewApplication, NewUser, Permission, PermissionAction, PermissionId, User, UserAccess,
        UserId, UserPatch,
    };
    pub use crate::query::{
        AccessQuery, AccessReport, ApplicationStats, DashboardStats, GrantDetails, GrantFilter,
        ReportExport,
    };
    pub use crate::registry::{Dispatched, Registry};
    pub use crate::store::{EntityStore, IdStrategy, Removal, StoreSettings};
    pub use crate::validation::{Validate, ValidationErrors};
}
