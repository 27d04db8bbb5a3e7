//! Access level commands.

use anyhow::Result;
use clap::Subcommand;
use tabled::Tabled;

use warden_core::models::{AccessLevel, ApplicationId, EntityKind};
use warden_core::registry::Registry;
use warden_core::WardenError;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum LevelsCommands {
    /// List access levels of the catalog or of one application
    List {
        /// Application ID
        #[arg(short, long)]
        app: Option<String>,
    },
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Scope")]
    scope: &'static str,
    #[tabled(rename = "Permissions")]
    permissions: usize,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn execute(cmd: LevelsCommands, registry: &Registry, format: OutputFormat) -> Result<()> {
    match cmd {
        LevelsCommands::List { app } => {
            let store = registry.snapshot();
            let levels: Vec<AccessLevel> = match app {
                Some(id) => {
                    let id = ApplicationId::new(id);
                    store
                        .application(&id)
                        .ok_or_else(|| {
                            WardenError::not_found(EntityKind::Application.as_str(), id.as_str())
                        })?
                        .access_levels
                        .clone()
                }
                None => store.access_levels().to_vec(),
            };

            let rows: Vec<LevelRow> = levels
                .iter()
                .map(|level| LevelRow {
                    id: level.id.to_string(),
                    name: level.name.clone(),
                    scope: if level.is_custom { "custom" } else { "global" },
                    permissions: level.permissions.len(),
                    description: output::truncate(&level.description, 48),
                })
                .collect();

            output::print_list(&rows, &levels, format)?;
        }
    }

    Ok(())
}
