//! Telemetry: structured logging and metric names.
//!
//! Counters are recorded through the `metrics` facade; an embedding process
//! decides whether and where to export them.

pub mod logging;

pub use logging::{build_filter, init_logging, LogFormat, LoggingConfig};

/// Counter names recorded by the registry.
pub mod metric_names {
    /// Commands dispatched, labelled by `kind` and `outcome`.
    pub const COMMANDS_TOTAL: &str = "warden_commands_total";
    /// Grants removed by cascading deletes, labelled by `cause`.
    pub const CASCADE_DELETED_TOTAL: &str = "warden_cascade_deleted_total";
    /// Access reports generated.
    pub const REPORTS_GENERATED_TOTAL: &str = "warden_reports_generated_total";
    /// Errors constructed, labelled by `code`, `category` and `severity`.
    pub const ERRORS_TOTAL: &str = "warden_errors_total";
}
