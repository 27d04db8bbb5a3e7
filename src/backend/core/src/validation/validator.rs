//! Validator trait and builders.
//!
//! - `Validate` trait for payload types
//! - `FieldValidator` for chaining rules on a single field
//! - `RequestValidator` for validating an entire payload

use crate::validation::error::{FieldError, ValidationErrors, ValidationResult};
use crate::validation::rules::ValidationRule;

// ═══════════════════════════════════════════════════════════════════════════════
// Validate Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait for payloads that can check their own required fields.
///
/// Checks that need the store (ids that must resolve) are done by the store.
pub trait Validate {
    /// Validate this object and return any validation errors.
    fn validate(&self) -> ValidationResult<()>;

    /// Check if this object is valid without returning detailed errors.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A builder for validating a single field with multiple rules.
pub struct FieldValidator<'a, T> {
    field_name: &'a str,
    value: &'a T,
    errors: Vec<FieldError>,
}

impl<'a, T> FieldValidator<'a, T> {
    /// Create a new field validator.
    pub fn new(field_name: &'a str, value: &'a T) -> Self {
        Self {
            field_name,
            value,
            errors: Vec::new(),
        }
    }

    /// Apply a validation rule.
    pub fn rule<R: ValidationRule<T>>(mut self, rule: R) -> Self {
        if let Some(error) = rule.validate(self.value) {
            self.errors.push(error);
        }
        self
    }

    /// Get the field name.
    pub fn field_name(&self) -> &str {
        self.field_name
    }

    /// Consume the validator and return the errors.
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Convert to a ValidationResult.
    pub fn result(self) -> ValidationResult<()> {
        let mut validation_errors = ValidationErrors::new();
        for error in self.errors {
            validation_errors.add(self.field_name, error);
        }
        validation_errors.into_result()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Request Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A builder for validating entire payloads with multiple fields.
pub struct RequestValidator {
    errors: ValidationErrors,
}

impl RequestValidator {
    /// Create a new request validator.
    pub fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    /// Validate a field and collect any errors.
    pub fn field<T>(mut self, validator: FieldValidator<'_, T>) -> Self {
        let field_name = validator.field_name().to_string();
        for error in validator.into_errors() {
            self.errors.add(&field_name, error);
        }
        self
    }

    /// Check if validation passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume and return the errors.
    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    /// Convert to a ValidationResult.
    pub fn result(self) -> ValidationResult<()> {
        self.errors.into_result()
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Create a field validator.
pub fn validate_field<'a, T>(field_name: &'a str, value: &'a T) -> FieldValidator<'a, T> {
    FieldValidator::new(field_name, value)
}

/// Create a request validator.
pub fn validate_request() -> RequestValidator {
    RequestValidator::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{MaxLength, Required};

    struct Signup {
        name: String,
        role: String,
    }

    impl Validate for Signup {
        fn validate(&self) -> ValidationResult<()> {
            validate_request()
                .field(validate_field("name", &self.name).rule(Required).rule(MaxLength(10)))
                .field(validate_field("role", &self.role).rule(Required))
                .result()
        }
    }

    #[test]
    fn test_request_validator_collects_all_fields() {
        let signup = Signup {
            name: String::new(),
            role: String::new(),
        };
        let errors = signup.validate().unwrap_err();
        assert!(errors.has_errors("name"));
        assert!(errors.has_errors("role"));
        assert!(!signup.is_valid());
    }
}
