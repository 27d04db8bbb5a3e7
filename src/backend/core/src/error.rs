//! Error handling for Warden Core.
//!
//! This module provides:
//! - A single error type carrying a machine-readable [`ErrorCode`]
//! - Structured details (entity, context, field-level validation errors)
//! - Severity-aware logging with tracing integration
//! - Metrics integration for error tracking
//!
//! # Usage
//!
//! ```rust,ignore
//! use warden_core::error::{WardenError, Result};
//!
//! fn lookup(id: &str) -> Result<()> {
//!     Err(WardenError::not_found("user", id))
//! }
//! ```

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

use crate::telemetry::metric_names;
use crate::validation::ValidationErrors;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for Warden operations.
pub type Result<T> = std::result::Result<T, WardenError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes.
///
/// These codes are stable and can be used by shells for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Registry Errors (1000-1099)
    RecordNotFound,
    ValidationError,
    ReportUnavailable,
    DuplicateRecord,

    // Serialization Errors (2200-2299)
    SerializationError,
    IoError,

    // Configuration Errors (5000-5099)
    ConfigurationError,

    // Internal Errors (9000-9099)
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::RecordNotFound => 1000,
            Self::ValidationError => 1001,
            Self::ReportUnavailable => 1002,
            Self::DuplicateRecord => 1003,
            Self::SerializationError => 2200,
            Self::IoError => 2201,
            Self::ConfigurationError => 5000,
            Self::InternalError => 9000,
        }
    }

    /// Get the category of this error.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::RecordNotFound
            | Self::ValidationError
            | Self::ReportUnavailable
            | Self::DuplicateRecord => "registry",
            Self::SerializationError | Self::IoError => "serialization",
            Self::ConfigurationError => "configuration",
            Self::InternalError => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Severity
// ═══════════════════════════════════════════════════════════════════════════════

/// Severity level for errors (affects logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Caller errors (bad input, unknown ids)
    Low,
    /// Broken seed data or configuration
    High,
    /// Bugs
    Critical,
}

impl ErrorSeverity {
    /// Get severity based on error code.
    pub const fn from_code(code: &ErrorCode) -> Self {
        match code {
            ErrorCode::RecordNotFound
            | ErrorCode::ValidationError
            | ErrorCode::ReportUnavailable
            | ErrorCode::DuplicateRecord => Self::Low,

            ErrorCode::SerializationError
            | ErrorCode::IoError
            | ErrorCode::ConfigurationError => Self::High,

            ErrorCode::InternalError => Self::Critical,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Details
// ═══════════════════════════════════════════════════════════════════════════════

/// Additional structured details about an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Additional context key-value pairs
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,

    /// Related entity ID (user, application, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Related entity type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<ValidationErrors>,
}

impl ErrorDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    pub fn with_field_errors(mut self, errors: ValidationErrors) -> Self {
        self.field_errors = Some(errors);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main Error Type
// ═══════════════════════════════════════════════════════════════════════════════

/// The main error type for Warden Core.
///
/// Errors are always local to the failing command: the store is left exactly
/// as it was before the command was attempted.
#[derive(Error, Debug)]
pub struct WardenError {
    /// Machine-readable error code
    code: ErrorCode,

    /// User-friendly error message
    message: Cow<'static, str>,

    /// Additional structured details
    details: ErrorDetails,

    /// The source error that caused this error
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for WardenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl WardenError {
    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new error with code and message.
    pub fn new(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        let error = Self {
            code,
            message: message.into(),
            details: ErrorDetails::default(),
            source: None,
        };
        error.record_metrics();
        error
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message.into())
    }

    /// Create a not found error.
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self::new(
            ErrorCode::RecordNotFound,
            format!("{} not found: {}", entity_type, entity_id),
        )
        .with_details(ErrorDetails::new().with_entity(&entity_type, &entity_id))
    }

    /// Create a validation error with a plain message.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create a validation error from collected field errors.
    pub fn invalid_fields(entity_type: impl Into<String>, errors: ValidationErrors) -> Self {
        let entity_type = entity_type.into();
        Self::new(
            ErrorCode::ValidationError,
            format!("invalid {}: {}", entity_type, errors),
        )
        .with_details(ErrorDetails {
            entity_type: Some(entity_type),
            field_errors: Some(errors),
            ..ErrorDetails::default()
        })
    }

    /// Create a report unavailable error.
    pub fn report_unavailable(application_id: impl Into<String>) -> Self {
        let application_id = application_id.into();
        Self::new(
            ErrorCode::ReportUnavailable,
            format!("no report available, application not found: {}", application_id),
        )
        .with_details(ErrorDetails::new().with_entity("application", &application_id))
    }

    /// Create a duplicate record error.
    pub fn duplicate(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self::new(
            ErrorCode::DuplicateRecord,
            format!("duplicate {} id: {}", entity_type, entity_id),
        )
        .with_details(ErrorDetails::new().with_entity(&entity_type, &entity_id))
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Add error details.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = details;
        self
    }

    /// Add context to details.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.details.context.insert(key.into(), v);
        }
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the user-friendly message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error details.
    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }

    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::from_code(&self.code)
    }

    /// True for a missing record and for a report on a missing application.
    pub fn is_not_found(&self) -> bool {
        matches!(self.code, ErrorCode::RecordNotFound | ErrorCode::ReportUnavailable)
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────────────────────────────

    /// Log this error with appropriate severity.
    pub fn log(&self) {
        let code = self.code.to_string();
        let category = self.code.category();

        match self.severity() {
            ErrorSeverity::Critical => {
                error!(
                    error_code = %code,
                    category = category,
                    message = %self.message,
                    details = ?self.details,
                    source = ?self.source,
                    "CRITICAL ERROR"
                );
            }
            ErrorSeverity::High => {
                warn!(
                    error_code = %code,
                    category = category,
                    message = %self.message,
                    source = ?self.source,
                    "High severity error"
                );
            }
            ErrorSeverity::Low => {
                tracing::debug!(
                    error_code = %code,
                    category = category,
                    message = %self.message,
                    "Command rejected"
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metrics
    // ─────────────────────────────────────────────────────────────────────────

    fn record_metrics(&self) {
        counter!(
            metric_names::ERRORS_TOTAL,
            "code" => self.code.to_string(),
            "category" => self.code.category().to_string(),
            "severity" => format!("{:?}", self.severity()),
        )
        .increment(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// From Implementations for Common Error Types
// ═══════════════════════════════════════════════════════════════════════════════

impl From<ValidationErrors> for WardenError {
    fn from(errors: ValidationErrors) -> Self {
        WardenError::new(ErrorCode::ValidationError, errors.to_string())
            .with_details(ErrorDetails::new().with_field_errors(errors))
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(error: serde_json::Error) -> Self {
        WardenError::new(
            ErrorCode::SerializationError,
            format!("JSON error at line {}: {}", error.line(), error),
        )
        .with_source(error)
    }
}

impl From<toml::de::Error> for WardenError {
    fn from(error: toml::de::Error) -> Self {
        WardenError::new(ErrorCode::SerializationError, format!("TOML error: {}", error))
            .with_source(error)
    }
}

impl From<toml::ser::Error> for WardenError {
    fn from(error: toml::ser::Error) -> Self {
        WardenError::new(ErrorCode::SerializationError, format!("TOML error: {}", error))
            .with_source(error)
    }
}

impl From<std::io::Error> for WardenError {
    fn from(error: std::io::Error) -> Self {
        WardenError::new(ErrorCode::IoError, format!("I/O error: {}", error)).with_source(error)
    }
}

impl From<config::ConfigError> for WardenError {
    fn from(error: config::ConfigError) -> Self {
        WardenError::new(
            ErrorCode::ConfigurationError,
            format!("Configuration error: {}", error),
        )
        .with_source(error)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
