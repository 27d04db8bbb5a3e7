//! Registry data model: users, applications, access levels, permissions and
//! the grants linking them.
//!
//! Every cross-entity link is an id resolved on demand against the store.
//! Input payloads (`New*`) and patches (`*Patch`) live next to the entity
//! they build or modify.

pub mod access;
pub mod access_level;
pub mod application;
pub mod ids;
pub mod permission;
pub mod user;

pub use access::{AccessPatch, GrantRequest, UserAccess};
pub use access_level::{AccessLevel, AccessLevelPatch, NewAccessLevel};
pub use application::{Application, ApplicationPatch, NewApplication};
pub use ids::{AccessId, AccessLevelId, ApplicationId, PermissionId, UserId};
pub use permission::{Permission, PermissionAction};
pub use user::{NewUser, User, UserPatch};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The five collections owned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Application,
    AccessLevel,
    Permission,
    UserAccess,
}

impl EntityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Application => "application",
            Self::AccessLevel => "access_level",
            Self::Permission => "permission",
            Self::UserAccess => "user_access",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserializes a patch field that distinguishes "absent" from "null".
///
/// Used with `#[serde(default, deserialize_with = "...")]`: a missing key
/// stays `None`, an explicit `null` becomes `Some(None)` (clear the value).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "double_option")]
        department: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_null_from_missing() {
        let missing: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.department, None);

        let cleared: Probe = serde_json::from_str(r#"{"department": null}"#).unwrap();
        assert_eq!(cleared.department, Some(None));

        let set: Probe = serde_json::from_str(r#"{"department": "Design"}"#).unwrap();
        assert_eq!(set.department, Some(Some("Design".to_string())));
    }

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::AccessLevel.to_string(), "access_level");
        assert_eq!(EntityKind::UserAccess.as_str(), "user_access");
    }
}
