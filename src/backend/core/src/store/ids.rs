//! Id assignment for new records.
//!
//! The store never derives ids from the clock. A generator is injected at
//! construction and shared by every snapshot derived from that store, so
//! ids stay unique across copy-on-write clones.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::SeedData;
use crate::error::{Result, WardenError};
use crate::models::EntityKind;

/// Source of fresh record ids.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Return an id never handed out before for `kind`.
    fn next_id(&self, kind: EntityKind) -> Result<String>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sequential
// ═══════════════════════════════════════════════════════════════════════════════

/// Monotonic per-collection counters.
///
/// Numbering continues after the highest numeric id already present, so
/// ids handed out for the built-in dataset look like `"5"`, `"6"`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counters: Mutex<HashMap<EntityKind, u64>>,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every counter after the highest numeric id found in `seed`.
    pub fn starting_after(seed: &SeedData) -> Self {
        let generator = Self::new();
        for user in &seed.users {
            generator.observe(EntityKind::User, user.id.as_str());
        }
        for app in &seed.applications {
            generator.observe(EntityKind::Application, app.id.as_str());
        }
        for level in &seed.access_levels {
            generator.observe(EntityKind::AccessLevel, level.id.as_str());
        }
        for perm in &seed.permissions {
            generator.observe(EntityKind::Permission, perm.id.as_str());
        }
        for access in &seed.user_access {
            generator.observe(EntityKind::UserAccess, access.id.as_str());
        }
        generator
    }

    /// Make sure the next id for `kind` is greater than `id` when it is numeric.
    pub fn observe(&self, kind: EntityKind, id: &str) {
        if let Ok(value) = id.parse::<u64>() {
            let mut counters = self.counters.lock();
            let current = counters.entry(kind).or_insert(0);
            if value > *current {
                *current = value;
            }
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self, kind: EntityKind) -> Result<String> {
        let mut counters = self.counters.lock();
        let current = counters.entry(kind).or_insert(0);
        *current = current.checked_add(1).ok_or_else(|| {
            WardenError::internal(format!("{} id space exhausted", kind))
                .with_context("entity", kind.as_str())
        })?;
        Ok(current.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// UUID
// ═══════════════════════════════════════════════════════════════════════════════

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, _kind: EntityKind) -> Result<String> {
        Ok(Uuid::new_v4().to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Strategy
// ═══════════════════════════════════════════════════════════════════════════════

/// Configured id strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Uuid,
}

impl IdStrategy {
    /// Build the generator for a store seeded with `seed`.
    pub fn generator(&self, seed: &SeedData) -> Arc<dyn IdGenerator> {
        match self {
            Self::Sequential => Arc::new(SequentialIdGenerator::starting_after(seed)),
            Self::Uuid => Arc::new(UuidIdGenerator),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "uuid" => Ok(Self::Uuid),
            other => Err(format!("unknown id strategy: {}", other)),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Uuid => write!(f, "uuid"),
        }
    }
}
