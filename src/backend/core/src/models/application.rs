//! Applications users can be granted access to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::access_level::{AccessLevel, MAX_NAME_LEN};
use super::double_option;
use super::ids::{AccessLevelId, ApplicationId, PermissionId};
use super::permission::Permission;
use crate::validation::{
    validate_field, validate_request, MaxLength, NotBlank, Required, UniqueItems, Validate,
    ValidationResult,
};

/// An application together with the access levels and custom permissions
/// it exposes for granting.
///
/// The embedded lists are copies of catalog entries; the store keeps them in
/// sync when a catalog access level is updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub access_levels: Vec<AccessLevel>,
    #[serde(default)]
    pub custom_permissions: Vec<Permission>,
}

impl Application {
    pub fn access_level(&self, id: &AccessLevelId) -> Option<&AccessLevel> {
        self.access_levels.iter().find(|level| &level.id == id)
    }

    pub fn has_access_level(&self, id: &AccessLevelId) -> bool {
        self.access_level(id).is_some()
    }

    pub fn custom_permission(&self, id: &PermissionId) -> Option<&Permission> {
        self.custom_permissions.iter().find(|perm| &perm.id == id)
    }

    pub fn access_level_ids(&self) -> Vec<AccessLevelId> {
        self.access_levels.iter().map(|level| level.id.clone()).collect()
    }

    pub fn custom_permission_ids(&self) -> Vec<PermissionId> {
        self.custom_permissions.iter().map(|perm| perm.id.clone()).collect()
    }
}

fn default_active() -> bool {
    true
}

/// Payload for `AddApplication`.
///
/// Access levels and custom permissions are picked from the catalogs by id.
/// Omitting `access_levels` selects every global (non-custom) level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub category: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_levels: Option<Vec<AccessLevelId>>,
    #[serde(default)]
    pub custom_permissions: Vec<PermissionId>,
}

impl Validate for NewApplication {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(Required).rule(MaxLength(MAX_NAME_LEN)))
            .field(validate_field("category", &self.category).rule(Required))
            .field(validate_field("accessLevels", &self.access_levels).rule(UniqueItems))
            .field(validate_field("customPermissions", &self.custom_permissions).rule(UniqueItems))
            .result()
    }
}

/// Payload for `UpdateApplication`. `None` leaves a field unchanged;
/// `url: null` clears the url.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_levels: Option<Vec<AccessLevelId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_permissions: Option<Vec<PermissionId>>,
}

impl Validate for ApplicationPatch {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(NotBlank).rule(MaxLength(MAX_NAME_LEN)))
            .field(validate_field("category", &self.category).rule(NotBlank))
            .field(validate_field("accessLevels", &self.access_levels).rule(UniqueItems))
            .field(validate_field("customPermissions", &self.custom_permissions).rule(UniqueItems))
            .result()
    }
}
