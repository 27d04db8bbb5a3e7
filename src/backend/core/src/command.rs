//! The registry's write surface.
//!
//! Every state change is one [`Command`]. Applying a command either succeeds
//! completely or leaves the store as it was.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::error::Result;
use crate::models::{
    AccessId, AccessLevel, AccessLevelId, AccessLevelPatch, AccessPatch, Application,
    ApplicationId, ApplicationPatch, EntityKind, GrantRequest, NewAccessLevel, NewApplication,
    NewUser, User, UserAccess, UserId, UserPatch,
};
use crate::store::{EntityStore, Removal};

// =============================================================================
// Commands
// =============================================================================

/// A single state transition.
///
/// Serialized as `{"type": "GRANT_ACCESS", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    AddUser(NewUser),
    UpdateUser { id: UserId, patch: UserPatch },
    DeleteUser { id: UserId },
    AddApplication(NewApplication),
    UpdateApplication { id: ApplicationId, patch: ApplicationPatch },
    DeleteApplication { id: ApplicationId },
    AddAccessLevel(NewAccessLevel),
    UpdateAccessLevel { id: AccessLevelId, patch: AccessLevelPatch },
    DeleteAccessLevel { id: AccessLevelId },
    GrantAccess(GrantRequest),
    RevokeAccess { id: AccessId },
    UpdateUserAccess { id: AccessId, patch: AccessPatch },
}

/// Fieldless mirror of [`Command`], used for logging and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    AddUser,
    UpdateUser,
    DeleteUser,
    AddApplication,
    UpdateApplication,
    DeleteApplication,
    AddAccessLevel,
    UpdateAccessLevel,
    DeleteAccessLevel,
    GrantAccess,
    RevokeAccess,
    UpdateUserAccess,
}

impl CommandKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AddUser => "add_user",
            Self::UpdateUser => "update_user",
            Self::DeleteUser => "delete_user",
            Self::AddApplication => "add_application",
            Self::UpdateApplication => "update_application",
            Self::DeleteApplication => "delete_application",
            Self::AddAccessLevel => "add_access_level",
            Self::UpdateAccessLevel => "update_access_level",
            Self::DeleteAccessLevel => "delete_access_level",
            Self::GrantAccess => "grant_access",
            Self::RevokeAccess => "revoke_access",
            Self::UpdateUserAccess => "update_user_access",
        }
    }

    /// The collection the command targets.
    pub const fn entity(&self) -> EntityKind {
        match self {
            Self::AddUser | Self::UpdateUser | Self::DeleteUser => EntityKind::User,
            Self::AddApplication | Self::UpdateApplication | Self::DeleteApplication => {
                EntityKind::Application
            }
            Self::AddAccessLevel | Self::UpdateAccessLevel | Self::DeleteAccessLevel => {
                EntityKind::AccessLevel
            }
            Self::GrantAccess | Self::RevokeAccess | Self::UpdateUserAccess => {
                EntityKind::UserAccess
            }
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    User(User),
    Application(Application),
    AccessLevel(AccessLevel),
    Grant(UserAccess),
    Removed {
        entity: EntityKind,
        id: String,
        #[serde(rename = "cascadedGrants")]
        cascaded_grants: Vec<AccessId>,
    },
}

impl CommandOutcome {
    fn removed<T>(entity: EntityKind, id: &str, removal: Removal<T>) -> Self {
        Self::Removed {
            entity,
            id: id.to_string(),
            cascaded_grants: removal.cascaded_grants,
        }
    }

    /// One-line description for shells.
    pub fn summary(&self) -> String {
        match self {
            Self::User(user) => format!("user {} ({})", user.id, user.name),
            Self::Application(app) => format!("application {} ({})", app.id, app.name),
            Self::AccessLevel(level) => format!("access level {} ({})", level.id, level.name),
            Self::Grant(grant) => format!(
                "grant {}: user {} -> application {} at level {}",
                grant.id, grant.user_id, grant.application_id, grant.access_level_id
            ),
            Self::Removed {
                entity,
                id,
                cascaded_grants,
            } if cascaded_grants.is_empty() => format!("removed {} {}", entity, id),
            Self::Removed {
                entity,
                id,
                cascaded_grants,
            } => format!(
                "removed {} {} and {} grant(s)",
                entity,
                id,
                cascaded_grants.len()
            ),
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::AddUser(_) => CommandKind::AddUser,
            Self::UpdateUser { .. } => CommandKind::UpdateUser,
            Self::DeleteUser { .. } => CommandKind::DeleteUser,
            Self::AddApplication(_) => CommandKind::AddApplication,
            Self::UpdateApplication { .. } => CommandKind::UpdateApplication,
            Self::DeleteApplication { .. } => CommandKind::DeleteApplication,
            Self::AddAccessLevel(_) => CommandKind::AddAccessLevel,
            Self::UpdateAccessLevel { .. } => CommandKind::UpdateAccessLevel,
            Self::DeleteAccessLevel { .. } => CommandKind::DeleteAccessLevel,
            Self::GrantAccess(_) => CommandKind::GrantAccess,
            Self::RevokeAccess { .. } => CommandKind::RevokeAccess,
            Self::UpdateUserAccess { .. } => CommandKind::UpdateUserAccess,
        }
    }

    /// Apply to a store in place. On error the store is unchanged.
    pub fn apply(self, store: &mut EntityStore) -> Result<CommandOutcome> {
        let kind = self.kind();

        let outcome = match self {
            Self::AddUser(input) => CommandOutcome::User(store.create_user(input)?),
            Self::UpdateUser { id, patch } => CommandOutcome::User(store.update_user(&id, patch)?),
            Self::DeleteUser { id } => {
                let removal = store.delete_user(&id)?;
                CommandOutcome::removed(EntityKind::User, id.as_str(), removal)
            }
            Self::AddApplication(input) => {
                CommandOutcome::Application(store.create_application(input)?)
            }
            Self::UpdateApplication { id, patch } => {
                CommandOutcome::Application(store.update_application(&id, patch)?)
            }
            Self::DeleteApplication { id } => {
                let removal = store.delete_application(&id)?;
                CommandOutcome::removed(EntityKind::Application, id.as_str(), removal)
            }
            Self::AddAccessLevel(input) => {
                CommandOutcome::AccessLevel(store.create_access_level(input)?)
            }
            Self::UpdateAccessLevel { id, patch } => {
                CommandOutcome::AccessLevel(store.update_access_level(&id, patch)?)
            }
            Self::DeleteAccessLevel { id } => {
                let removal = store.delete_access_level(&id)?;
                CommandOutcome::removed(EntityKind::AccessLevel, id.as_str(), removal)
            }
            Self::GrantAccess(request) => CommandOutcome::Grant(store.grant_access(request)?),
            Self::RevokeAccess { id } => {
                store.revoke_access(&id)?;
                CommandOutcome::Removed {
                    entity: EntityKind::UserAccess,
                    id: id.to_string(),
                    cascaded_grants: Vec::new(),
                }
            }
            Self::UpdateUserAccess { id, patch } => {
                CommandOutcome::Grant(store.update_access(&id, patch)?)
            }
        };

        info!(command = %kind, outcome = %outcome.summary(), "Command applied");
        Ok(outcome)
    }
}

/// Pure transition: the state after `command`, leaving `state` untouched.
pub fn transition(state: &EntityStore, command: Command) -> Result<(EntityStore, CommandOutcome)> {
    let mut next = state.clone();
    let outcome = command.apply(&mut next)?;
    Ok((next, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_command_wire_format() {
        let json = r#"{"type":"GRANT_ACCESS","payload":{"userId":"4","applicationId":"1","accessLevelId":"1"}}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command, Command::GrantAccess(GrantRequest::new("4", "1", "1")));
        assert_eq!(command.kind(), CommandKind::GrantAccess);

        let delete = Command::DeleteUser { id: "3".into() };
        let value = serde_json::to_value(&delete).unwrap();
        assert_eq!(value["type"], "DELETE_USER");
        assert_eq!(value["payload"]["id"], "3");
    }

    #[test]
    fn test_patch_command_from_json() {
        let json = r#"{"type":"UPDATE_USER","payload":{"id":"2","patch":{"department":null}}}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        match command {
            Command::UpdateUser { id, patch } => {
                assert_eq!(id.as_str(), "2");
                assert_eq!(patch.department, Some(None));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_transition_leaves_input_untouched() {
        let before = EntityStore::builtin().unwrap();
        let (after, outcome) =
            transition(&before, Command::DeleteApplication { id: "4".into() }).unwrap();

        assert_eq!(before.applications().len(), 5);
        assert_eq!(after.applications().len(), 4);
        match outcome {
            CommandOutcome::Removed {
                entity,
                cascaded_grants,
                ..
            } => {
                assert_eq!(entity, EntityKind::Application);
                assert_eq!(cascaded_grants.len(), 4);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_failed_command_reports_error() {
        let before = EntityStore::builtin().unwrap();
        let err = transition(&before, Command::RevokeAccess { id: "77".into() }).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }

    #[test]
    fn test_kind_targets() {
        assert_eq!(CommandKind::UpdateUserAccess.entity(), EntityKind::UserAccess);
        assert_eq!(CommandKind::AddAccessLevel.as_str(), "add_access_level");
    }

    #[test]
    fn test_outcome_summary() {
        let mut store = EntityStore::builtin().unwrap();
        let outcome = Command::DeleteUser { id: "4".into() }.apply(&mut store).unwrap();
        assert_eq!(outcome.summary(), "removed user 4 and 2 grant(s)");
    }
}
