//! Shared registry handle.
//!
//! Writes are serialized and applied to a private copy of the current
//! store, which then replaces the published snapshot in one step. Readers
//! hold an `Arc` to whichever snapshot was current when they started, so
//! they never observe a half-applied command.

use std::sync::Arc;

use metrics::counter;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::catalog::SeedData;
use crate::command::{transition, Command, CommandOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::models::{AccessLevel, Application, ApplicationId, Permission, User, UserAccess, UserId};
use crate::query::{AccessReport, ApplicationStats, DashboardStats, GrantDetails, GrantFilter};
use crate::store::EntityStore;
use crate::telemetry::metric_names;

/// Default length of the dashboard's recent activity list.
pub const DEFAULT_RECENT_ACTIVITY_LIMIT: usize = 5;

/// Result of a successful dispatch.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub outcome: CommandOutcome,
    /// The state published by this command.
    pub snapshot: Arc<EntityStore>,
}

pub struct Registry {
    current: RwLock<Arc<EntityStore>>,
    writer: Mutex<()>,
    recent_activity_limit: usize,
}

impl Registry {
    pub fn new(store: EntityStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
            writer: Mutex::new(()),
            recent_activity_limit: DEFAULT_RECENT_ACTIVITY_LIMIT,
        }
    }

    pub fn with_recent_activity_limit(mut self, limit: usize) -> Self {
        self.recent_activity_limit = limit;
        self
    }

    /// Seed a registry as configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let seed = config.registry.load_seed()?;
        let store = EntityStore::from_seed(seed, &config.registry.store_settings())?;
        Ok(Self::new(store).with_recent_activity_limit(config.registry.recent_activity_limit))
    }

    /// Registry over the built-in sample dataset.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(EntityStore::builtin()?))
    }

    /// The current state. Unaffected by later commands.
    pub fn snapshot(&self) -> Arc<EntityStore> {
        self.current.read().clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one command and publish the resulting state.
    pub fn dispatch(&self, command: Command) -> Result<Dispatched> {
        let _writer = self.writer.lock();
        let kind = command.kind();
        let base = self.snapshot();

        match transition(&base, command) {
            Ok((next, outcome)) => {
                let next = Arc::new(next);
                *self.current.write() = Arc::clone(&next);
                counter!(metric_names::COMMANDS_TOTAL, "kind" => kind.as_str(), "outcome" => "ok")
                    .increment(1);
                debug!(command = %kind, "Snapshot published");
                Ok(Dispatched {
                    outcome,
                    snapshot: next,
                })
            }
            Err(err) => {
                counter!(metric_names::COMMANDS_TOTAL, "kind" => kind.as_str(), "outcome" => "error")
                    .increment(1);
                err.log();
                Err(err)
            }
        }
    }

    /// Apply commands in order, stopping at the first failure. Commands
    /// before the failing one stay applied.
    pub fn dispatch_all<I>(&self, commands: I) -> Result<Vec<CommandOutcome>>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut outcomes = Vec::new();
        for command in commands {
            outcomes.push(self.dispatch(command)?.outcome);
        }
        info!(commands = outcomes.len(), "Command batch applied");
        Ok(outcomes)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_users(&self) -> Vec<User> {
        self.snapshot().users().to_vec()
    }

    pub fn list_applications(&self) -> Vec<Application> {
        self.snapshot().applications().to_vec()
    }

    pub fn list_access_levels(&self) -> Vec<AccessLevel> {
        self.snapshot().access_levels().to_vec()
    }

    pub fn list_permissions(&self) -> Vec<Permission> {
        self.snapshot().permissions().to_vec()
    }

    pub fn list_user_access(&self) -> Vec<UserAccess> {
        self.snapshot().user_access().to_vec()
    }

    pub fn users_for_application(&self, application_id: &ApplicationId) -> Vec<User> {
        let store = self.snapshot();
        let users = store.query().users_for_application(application_id);
        users.into_iter().cloned().collect()
    }

    pub fn applications_for_user(&self, user_id: &UserId) -> Vec<Application> {
        let store = self.snapshot();
        let apps = store.query().applications_for_user(user_id);
        apps.into_iter().cloned().collect()
    }

    pub fn generate_access_report(&self, application_id: &ApplicationId) -> Result<AccessReport> {
        self.snapshot().query().generate_access_report(application_id)
    }

    pub fn list_grants(&self, filter: &GrantFilter) -> Vec<GrantDetails> {
        self.snapshot().query().list_grants(filter)
    }

    pub fn active_grant_count(&self, user_id: &UserId) -> usize {
        self.snapshot().query().active_grant_count(user_id)
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        self.snapshot().query().dashboard_stats(self.recent_activity_limit)
    }

    pub fn application_stats(&self, application_id: &ApplicationId) -> Result<ApplicationStats> {
        self.snapshot().query().application_stats(application_id)
    }

    pub fn effective_permissions(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<Vec<Permission>> {
        let store = self.snapshot();
        let permissions = store.query().effective_permissions(user_id, application_id)?;
        Ok(permissions.into_iter().cloned().collect())
    }

    /// The current state in seed format.
    pub fn export_seed(&self) -> SeedData {
        self.snapshot().to_seed()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.snapshot();
        f.debug_struct("Registry")
            .field("users", &store.users().len())
            .field("applications", &store.applications().len())
            .field("grants", &store.user_access().len())
            .field("recent_activity_limit", &self.recent_activity_limit)
            .finish()
    }
}
