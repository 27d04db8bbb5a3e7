//! Permission catalog commands.

use anyhow::Result;
use clap::Subcommand;
use tabled::Tabled;

use warden_core::models::{ApplicationId, EntityKind, Permission};
use warden_core::registry::Registry;
use warden_core::WardenError;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum PermissionsCommands {
    /// List the permission catalog or one application's custom permissions
    List {
        /// Application ID
        #[arg(short, long)]
        app: Option<String>,

        /// Only permissions on this resource
        #[arg(short, long)]
        resource: Option<String>,
    },
}

#[derive(Tabled)]
struct PermissionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Action")]
    action: String,
}

pub fn execute(cmd: PermissionsCommands, registry: &Registry, format: OutputFormat) -> Result<()> {
    match cmd {
        PermissionsCommands::List { app, resource } => {
            let store = registry.snapshot();
            let source: Vec<Permission> = match app {
                Some(id) => {
                    let id = ApplicationId::new(id);
                    store
                        .application(&id)
                        .ok_or_else(|| {
                            WardenError::not_found(EntityKind::Application.as_str(), id.as_str())
                        })?
                        .custom_permissions
                        .clone()
                }
                None => store.permissions().to_vec(),
            };
            let permissions: Vec<Permission> = source
                .into_iter()
                .filter(|perm| resource.as_deref().map_or(true, |r| perm.resource == r))
                .collect();

            let rows: Vec<PermissionRow> = permissions
                .iter()
                .map(|perm| PermissionRow {
                    id: perm.id.to_string(),
                    name: perm.name.clone(),
                    resource: perm.resource.clone(),
                    action: perm.action.to_string(),
                })
                .collect();

            output::print_list(&rows, &permissions, format)?;
        }
    }

    Ok(())
}
