//! Fine-grained permission definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::PermissionId;

/// The operation a permission allows on its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Read,
    Write,
    Delete,
    Admin,
}

impl PermissionAction {
    pub const ALL: [PermissionAction; 4] = [Self::Read, Self::Write, Self::Delete, Self::Admin];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown permission action: {}", other)),
        }
    }
}

/// A permission is an action on a resource tag, for example `repository:write`.
///
/// Permissions are never mutated once they are in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub description: String,
    pub resource: String,
    pub action: PermissionAction,
}

impl Permission {
    pub fn new(
        id: impl Into<PermissionId>,
        name: impl Into<String>,
        description: impl Into<String>,
        resource: impl Into<String>,
        action: PermissionAction,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            resource: resource.into(),
            action,
        }
    }

    /// `resource:action` form.
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!("READ".parse::<PermissionAction>(), Ok(PermissionAction::Read));
        assert_eq!("admin".parse::<PermissionAction>(), Ok(PermissionAction::Admin));
        assert!("execute".parse::<PermissionAction>().is_err());
    }

    #[test]
    fn test_permission_serializes_lowercase_action() {
        let perm = Permission::new("8", "Repository Write", "Can push commits", "repository", PermissionAction::Write);
        let json = serde_json::to_value(&perm).unwrap();
        assert_eq!(json["action"], "write");
        assert_eq!(json["id"], "8");
        assert_eq!(perm.key(), "repository:write");
    }
}
