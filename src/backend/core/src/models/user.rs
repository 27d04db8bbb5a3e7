//! Registry users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::double_option;
use super::ids::UserId;
use crate::validation::{
    validate_field, validate_request, MaxLength, NotBlank, Required, Validate, ValidationResult,
};

const MAX_EMAIL_LEN: usize = 254;

/// A person who can be granted access to applications.
///
/// `email` is a business key by convention only; the store does not
/// enforce uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Apply a patch. `id` and `created_at` are preserved.
    pub(crate) fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(last_login) = patch.last_login {
            self.last_login = last_login;
        }
    }
}

fn default_active() -> bool {
    true
}

/// Payload for `AddUser`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Validate for NewUser {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(Required).rule(MaxLength(120)))
            .field(validate_field("email", &self.email).rule(Required).rule(MaxLength(MAX_EMAIL_LEN)))
            .field(validate_field("role", &self.role).rule(Required))
            .result()
    }
}

/// Payload for `UpdateUser`. `None` leaves a field unchanged;
/// `department: null` and `lastLogin: null` clear the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub department: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<Option<DateTime<Utc>>>,
}

impl Validate for UserPatch {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(NotBlank).rule(MaxLength(120)))
            .field(validate_field("email", &self.email).rule(NotBlank).rule(MaxLength(MAX_EMAIL_LEN)))
            .field(validate_field("role", &self.role).rule(NotBlank))
            .result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> User {
        User {
            id: "2".into(),
            name: "Jane Smith".into(),
            email: "jane.smith@company.com".into(),
            role: "Product Manager".into(),
            department: Some("Product".into()),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_new_user_required_fields() {
        let errors = NewUser::default().validate().unwrap_err();
        assert!(errors.has_errors("name"));
        assert!(errors.has_errors("email"));
        assert!(errors.has_errors("role"));
        assert!(!errors.has_errors("department"));
    }

    #[test]
    fn test_patch_preserves_identity() {
        let mut user = jane();
        let created_at = user.created_at;
        user.apply_patch(UserPatch {
            role: Some("Director".into()),
            department: Some(None),
            is_active: Some(false),
            ..Default::default()
        });

        assert_eq!(user.id, UserId::from("2"));
        assert_eq!(user.created_at, created_at);
        assert_eq!(user.role, "Director");
        assert_eq!(user.department, None);
        assert!(!user.is_active);
        assert_eq!(user.name, "Jane Smith");
    }

    #[test]
    fn test_blank_patch_email_rejected() {
        let patch = UserPatch {
            email: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().unwrap_err().has_errors("email"));
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let json = serde_json::to_value(jane()).unwrap();
        assert_eq!(json["isActive"], true);
        assert!(json.get("lastLogin").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
