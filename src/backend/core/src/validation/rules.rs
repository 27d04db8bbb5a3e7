//! Validation rules for registry payloads.
//!
//! - Required field validation
//! - String length constraints
//! - Set membership for single values and collections
//! - Duplicate detection

use crate::validation::error::{FieldError, ValidationErrorKind};
use std::collections::HashSet;
use std::hash::Hash;

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Rule Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// A validation rule that can be applied to a value.
pub trait ValidationRule<T> {
    /// Validate the value and return any errors.
    fn validate(&self, value: &T) -> Option<FieldError>;

    /// Get a description of this rule.
    fn description(&self) -> String;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Required Field Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates a field is present and non-blank.
#[derive(Debug, Clone)]
pub struct Required;

impl ValidationRule<String> for Required {
    fn validate(&self, value: &String) -> Option<FieldError> {
        if value.trim().is_empty() {
            Some(FieldError::new(ValidationErrorKind::Required))
        } else {
            None
        }
    }

    fn description(&self) -> String {
        "field is required".to_string()
    }
}

impl<T> ValidationRule<Vec<T>> for Required {
    fn validate(&self, value: &Vec<T>) -> Option<FieldError> {
        if value.is_empty() {
            Some(FieldError::new(ValidationErrorKind::Required))
        } else {
            None
        }
    }

    fn description(&self) -> String {
        "field is required".to_string()
    }
}

/// Rule that rejects `Some("")`: an optional field may be absent but not blank.
#[derive(Debug, Clone)]
pub struct NotBlank;

impl ValidationRule<Option<String>> for NotBlank {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        match value {
            Some(s) if s.trim().is_empty() => Some(FieldError::new(ValidationErrorKind::Required)),
            _ => None,
        }
    }

    fn description(&self) -> String {
        "must not be blank when present".to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// String Length Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates string maximum length.
#[derive(Debug, Clone)]
pub struct MaxLength(pub usize);

impl ValidationRule<String> for MaxLength {
    fn validate(&self, value: &String) -> Option<FieldError> {
        let len = value.chars().count();
        if len > self.0 {
            Some(FieldError::new(ValidationErrorKind::MaxLength {
                max: self.0,
                actual: len,
            }))
        } else {
            None
        }
    }

    fn description(&self) -> String {
        format!("maximum length: {}", self.0)
    }
}

impl ValidationRule<Option<String>> for MaxLength {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        match value {
            Some(s) => <MaxLength as ValidationRule<String>>::validate(self, s),
            None => None,
        }
    }

    fn description(&self) -> String {
        format!("maximum length: {}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Collection Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates no duplicate items in a collection.
#[derive(Debug, Clone, Default)]
pub struct UniqueItems;

impl<T: Eq + Hash> ValidationRule<Vec<T>> for UniqueItems {
    fn validate(&self, value: &Vec<T>) -> Option<FieldError> {
        let set: HashSet<&T> = value.iter().collect();
        if set.len() != value.len() {
            Some(FieldError::new(ValidationErrorKind::DuplicateItems))
        } else {
            None
        }
    }

    fn description(&self) -> String {
        "unique items only".to_string()
    }
}

impl<T: Eq + Hash> ValidationRule<Option<Vec<T>>> for UniqueItems {
    fn validate(&self, value: &Option<Vec<T>>) -> Option<FieldError> {
        value
            .as_ref()
            .and_then(|items| <UniqueItems as ValidationRule<Vec<T>>>::validate(self, items))
    }

    fn description(&self) -> String {
        "unique items only".to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Set Membership Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Rule that validates a value is in a predefined set.
#[derive(Debug, Clone)]
pub struct OneOf<T> {
    allowed: Vec<T>,
}

impl<T> OneOf<T> {
    pub fn new(allowed: Vec<T>) -> Self {
        Self { allowed }
    }
}

impl<T: PartialEq + ToString> ValidationRule<T> for OneOf<T> {
    fn validate(&self, value: &T) -> Option<FieldError> {
        if self.allowed.contains(value) {
            None
        } else {
            Some(FieldError::new(ValidationErrorKind::NotInSet {
                allowed: self.allowed.iter().map(|v| v.to_string()).collect(),
            }))
        }
    }

    fn description(&self) -> String {
        format!("one of: {:?}", self.allowed.iter().map(|v| v.to_string()).collect::<Vec<_>>())
    }
}

/// Rule that validates every item of a collection is in a predefined set.
#[derive(Debug, Clone)]
pub struct AllOf<T> {
    allowed: Vec<T>,
}

impl<T> AllOf<T> {
    pub fn new(allowed: Vec<T>) -> Self {
        Self { allowed }
    }
}

impl<T: PartialEq + ToString> ValidationRule<Vec<T>> for AllOf<T> {
    fn validate(&self, value: &Vec<T>) -> Option<FieldError> {
        let unknown: Vec<String> = value
            .iter()
            .filter(|item| !self.allowed.contains(item))
            .map(|item| item.to_string())
            .collect();

        if unknown.is_empty() {
            None
        } else {
            Some(FieldError::new(ValidationErrorKind::UnknownItems { unknown }))
        }
    }

    fn description(&self) -> String {
        format!("all of: {:?}", self.allowed.iter().map(|v| v.to_string()).collect::<Vec<_>>())
    }
}
