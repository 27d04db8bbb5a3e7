//! Named permission bundles.

use serde::{Deserialize, Serialize};

use super::ids::{AccessLevelId, ApplicationId, PermissionId};
use crate::validation::{
    validate_field, validate_request, MaxLength, NotBlank, Required, UniqueItems, Validate,
    ValidationResult,
};

/// Maximum length of a display name.
pub const MAX_NAME_LEN: usize = 120;

/// A named bundle of permission references.
///
/// `is_custom` is false for the globally shared levels and true for levels
/// that only make sense inside one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLevel {
    pub id: AccessLevelId,
    pub name: String,
    pub description: String,
    pub permissions: Vec<PermissionId>,
    pub is_custom: bool,
}

impl AccessLevel {
    pub fn grants(&self, permission: &PermissionId) -> bool {
        self.permissions.contains(permission)
    }

    /// Apply a patch. The id never changes.
    pub(crate) fn apply_patch(&mut self, patch: AccessLevelPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions;
        }
        if let Some(is_custom) = patch.is_custom {
            self.is_custom = is_custom;
        }
    }
}

/// Payload for `AddAccessLevel`.
///
/// With `application_id` set the level is also appended to that
/// application's access levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccessLevel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<PermissionId>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
}

impl Validate for NewAccessLevel {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(Required).rule(MaxLength(MAX_NAME_LEN)))
            .field(validate_field("permissions", &self.permissions).rule(UniqueItems))
            .result()
    }
}

/// Payload for `UpdateAccessLevel`. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLevelPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
}

impl Validate for AccessLevelPatch {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(NotBlank).rule(MaxLength(MAX_NAME_LEN)))
            .field(validate_field("permissions", &self.permissions).rule(UniqueItems))
            .result()
    }
}
