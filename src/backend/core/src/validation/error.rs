//! Validation error types with field-level error support.
//!
//! Errors are collected per field path (e.g. `"accessLevelId"`,
//! `"customPermissionIds[2]"`) so a shell can render them inline next to the
//! offending form field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Error Types
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of validation error that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Field is required but was missing or empty.
    Required,
    /// String length exceeds the maximum.
    MaxLength { max: usize, actual: usize },
    /// Value is not in the allowed set.
    NotInSet { allowed: Vec<String> },
    /// Some items of a collection are not in the allowed set.
    UnknownItems { unknown: Vec<String> },
    /// Array/collection contains duplicate items.
    DuplicateItems,
    /// Referenced record does not exist.
    UnknownReference { entity: String, id: String },
    /// Custom validation failed.
    Custom { code: String },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "field is required"),
            Self::MaxLength { max, actual } => {
                write!(f, "must be at most {} characters (got {})", max, actual)
            }
            Self::NotInSet { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
            Self::UnknownItems { unknown } => {
                write!(f, "contains values that are not allowed: {}", unknown.join(", "))
            }
            Self::DuplicateItems => write!(f, "must not contain duplicate items"),
            Self::UnknownReference { entity, id } => write!(f, "{} {} does not exist", entity, id),
            Self::Custom { code } => write!(f, "validation failed: {}", code),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Error
// ═══════════════════════════════════════════════════════════════════════════════

/// A single validation error for a specific field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(kind: ValidationErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Create a new field error with a custom message.
    pub fn with_message(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Errors Collection
// ═══════════════════════════════════════════════════════════════════════════════

/// A collection of validation errors organized by field path.
///
/// Fields are kept sorted so rendered messages are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any validation errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the total number of errors across all fields.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(|v| v.len()).sum()
    }

    /// Add an error for a specific field.
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.entry(field.into()).or_default().push(error);
    }

    /// Add an error with just the kind (auto-generates message).
    pub fn add_error(&mut self, field: impl Into<String>, kind: ValidationErrorKind) {
        self.add(field, FieldError::new(kind));
    }

    /// Add an error with a custom message.
    pub fn add_with_message(
        &mut self,
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) {
        self.add(field, FieldError::with_message(kind, message));
    }

    /// Add a required field error.
    pub fn add_required(&mut self, field: impl Into<String>) {
        self.add_error(field, ValidationErrorKind::Required);
    }

    /// Add an unresolved reference error.
    pub fn add_unknown_reference(
        &mut self,
        field: impl Into<String>,
        entity: impl Into<String>,
        id: impl Into<String>,
    ) {
        self.add_error(
            field,
            ValidationErrorKind::UnknownReference {
                entity: entity.into(),
                id: id.into(),
            },
        );
    }

    /// Get errors for a specific field.
    pub fn get(&self, field: &str) -> Option<&Vec<FieldError>> {
        self.errors.get(field)
    }

    /// Check if a specific field has errors.
    pub fn has_errors(&self, field: &str) -> bool {
        self.errors.get(field).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// Convert to a flat list of error messages with field prefixes.
    pub fn to_flat_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| format!("{}: {}", field, e.message))
            })
            .collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_flat_messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Result Type
// ═══════════════════════════════════════════════════════════════════════════════

/// Result type for validation operations.
pub type ValidationResult<T> = std::result::Result<T, ValidationErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_grouped_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add_required("name");
        errors.add_required("email");
        errors.add_error("name", ValidationErrorKind::MaxLength { max: 3, actual: 5 });

        assert_eq!(errors.error_count(), 3);
        assert_eq!(errors.get("name").map(Vec::len), Some(2));
        assert!(errors.has_errors("email"));
        assert!(!errors.has_errors("role"));
    }

    #[test]
    fn test_display_is_sorted_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add_required("role");
        errors.add_required("email");

        assert_eq!(
            errors.to_string(),
            "email: field is required; role: field is required"
        );
    }

    #[test]
    fn test_unknown_reference_message() {
        let mut errors = ValidationErrors::new();
        errors.add_unknown_reference("userId", "user", "99");
        assert_eq!(errors.to_flat_messages(), vec!["userId: user 99 does not exist"]);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add_required("name");
        assert!(errors.into_result().is_err());
    }
}
