//! Payload validation for registry commands.
//!
//! Rules are chained per field with [`validate_field`] and collected per
//! payload with [`validate_request`]:
//!
//! ```rust,ignore
//! use warden_core::validation::{validate_field, validate_request, Required, Validate, ValidationResult};
//!
//! impl Validate for NewUser {
//!     fn validate(&self) -> ValidationResult<()> {
//!         validate_request()
//!             .field(validate_field("name", &self.name).rule(Required))
//!             .field(validate_field("email", &self.email).rule(Required))
//!             .result()
//!     }
//! }
//! ```

pub mod error;
pub mod rules;
pub mod validator;

pub use error::{FieldError, ValidationErrorKind, ValidationErrors, ValidationResult};
pub use rules::{AllOf, MaxLength, NotBlank, OneOf, Required, UniqueItems, ValidationRule};
pub use validator::{validate_field, validate_request, FieldValidator, RequestValidator, Validate};
