//! Grants: the `UserAccess` relationship between a user and an application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::double_option;
use super::ids::{AccessId, AccessLevelId, ApplicationId, PermissionId, UserId};
use crate::validation::{
    validate_field, validate_request, NotBlank, Required, UniqueItems, Validate, ValidationResult,
};

/// One grant linking a user to an application at an access level.
///
/// Grants are independent: the same (user, application) pair may hold
/// several at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccess {
    pub id: AccessId,
    pub user_id: UserId,
    pub application_id: ApplicationId,
    pub access_level_id: AccessLevelId,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub custom_permissions: Vec<PermissionId>,
}

impl UserAccess {
    /// Whether `expires_at` lies at or before `now`.
    ///
    /// Expiry is informational: projections only look at `is_active`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }

    pub(crate) fn apply_patch(&mut self, patch: AccessPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(application_id) = patch.application_id {
            self.application_id = application_id;
        }
        if let Some(access_level_id) = patch.access_level_id {
            self.access_level_id = access_level_id;
        }
        if let Some(custom_permissions) = patch.custom_permissions {
            self.custom_permissions = custom_permissions;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(expires_at) = patch.expires_at {
            self.expires_at = expires_at;
        }
        if let Some(granted_by) = patch.granted_by {
            self.granted_by = granted_by;
        }
    }
}

fn default_active() -> bool {
    true
}

/// Payload for `GrantAccess`.
///
/// `granted_by` falls back to the store's configured default actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest {
    pub user_id: UserId,
    pub application_id: ApplicationId,
    pub access_level_id: AccessLevelId,
    #[serde(default)]
    pub custom_permissions: Vec<PermissionId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<String>,
}

impl GrantRequest {
    pub fn new(
        user_id: impl Into<UserId>,
        application_id: impl Into<ApplicationId>,
        access_level_id: impl Into<AccessLevelId>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            application_id: application_id.into(),
            access_level_id: access_level_id.into(),
            custom_permissions: Vec::new(),
            is_active: true,
            expires_at: None,
            granted_by: None,
        }
    }

    pub fn with_custom_permissions(mut self, ids: impl IntoIterator<Item = impl Into<PermissionId>>) -> Self {
        self.custom_permissions = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn granted_by(mut self, actor: impl Into<String>) -> Self {
        self.granted_by = Some(actor.into());
        self
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

impl Validate for GrantRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("userId", &self.user_id.0).rule(Required))
            .field(validate_field("applicationId", &self.application_id.0).rule(Required))
            .field(validate_field("accessLevelId", &self.access_level_id.0).rule(Required))
            .field(validate_field("customPermissions", &self.custom_permissions).rule(UniqueItems))
            .field(validate_field("grantedBy", &self.granted_by).rule(NotBlank))
            .result()
    }
}

/// Payload for `UpdateUserAccess`. `None` leaves a field unchanged;
/// `expiresAt: null` removes the expiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level_id: Option<AccessLevelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_permissions: Option<Vec<PermissionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<String>,
}

impl Validate for AccessPatch {
    fn validate(&self) -> ValidationResult<()> {
        let user_id = self.user_id.as_ref().map(|id| id.0.clone());
        let application_id = self.application_id.as_ref().map(|id| id.0.clone());
        let access_level_id = self.access_level_id.as_ref().map(|id| id.0.clone());

        validate_request()
            .field(validate_field("userId", &user_id).rule(NotBlank))
            .field(validate_field("applicationId", &application_id).rule(NotBlank))
            .field(validate_field("accessLevelId", &access_level_id).rule(NotBlank))
            .field(validate_field("customPermissions", &self.custom_permissions).rule(UniqueItems))
            .field(validate_field("grantedBy", &self.granted_by).rule(NotBlank))
            .result()
    }
}
