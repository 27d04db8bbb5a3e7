//! Command implementations, one module per subcommand.

pub mod access;
pub mod apply;
pub mod apps;
pub mod config;
pub mod levels;
pub mod permissions;
pub mod report;
pub mod stats;
pub mod users;
