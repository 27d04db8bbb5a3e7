//! Permission and access level catalogs plus the seed dataset.
//!
//! A [`SeedData`] is the complete initial population of the store. It is
//! either the built-in sample dataset or loaded from a JSON/TOML file, and a
//! store snapshot can be dumped back into the same shape.

pub mod access_levels;
pub mod permissions;
pub mod sample;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WardenError};
use crate::models::{AccessLevel, Application, Permission, User, UserAccess};

pub use access_levels::{builtin_access_levels, PredefinedLevel};
pub use permissions::builtin_permissions;
pub use sample::DEFAULT_GRANTED_BY;

/// On-disk dataset format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFormat {
    Json,
    Toml,
}

impl SeedFormat {
    /// Pick the format from a file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// The five collections of the store, as loaded at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub access_levels: Vec<AccessLevel>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub user_access: Vec<UserAccess>,
}

impl SeedData {
    /// The built-in sample dataset.
    pub fn builtin() -> Self {
        Self {
            users: sample::sample_users(),
            applications: sample::sample_applications(),
            access_levels: builtin_access_levels(),
            permissions: builtin_permissions(),
            user_access: sample::sample_grants(),
        }
    }

    /// Only the permission and access level catalogs, no users or grants.
    pub fn catalogs_only() -> Self {
        Self {
            access_levels: builtin_access_levels(),
            permissions: builtin_permissions(),
            ..Self::default()
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a dataset file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            WardenError::from(e).with_context("path", path.display().to_string())
        })?;

        let seed = match SeedFormat::from_path(path) {
            SeedFormat::Json => Self::from_json_str(&content)?,
            SeedFormat::Toml => Self::from_toml_str(&content)?,
        };

        debug!(
            path = %path.display(),
            users = seed.users.len(),
            applications = seed.applications.len(),
            grants = seed.user_access.len(),
            "Loaded seed file"
        );
        Ok(seed)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the dataset, picking the format from the file extension.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = match SeedFormat::from_path(path) {
            SeedFormat::Json => self.to_json_pretty()?,
            SeedFormat::Toml => self.to_toml_string()?,
        };
        fs::write(path, content)?;
        Ok(())
    }
}
