//! Grant listing and effective permission commands.

use anyhow::Result;
use clap::Subcommand;
use tabled::Tabled;

use warden_core::models::{ApplicationId, UserId};
use warden_core::query::GrantFilter;
use warden_core::registry::Registry;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum AccessCommands {
    /// List active grants
    List {
        /// Only grants on this application
        #[arg(short, long)]
        app: Option<String>,

        /// Only grants held by this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show everything a user may do in an application
    Effective {
        /// User ID
        #[arg(short, long)]
        user: String,

        /// Application ID
        #[arg(short, long)]
        app: String,
    },
}

#[derive(Tabled)]
struct GrantRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Access Level")]
    level: String,
    #[tabled(rename = "Custom")]
    custom: usize,
    #[tabled(rename = "Granted By")]
    granted_by: String,
    #[tabled(rename = "Granted")]
    granted_at: String,
    #[tabled(rename = "Expires")]
    expires_at: String,
}

#[derive(Tabled)]
struct EffectiveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Permission")]
    name: String,
    #[tabled(rename = "Key")]
    key: String,
}

pub fn execute(cmd: AccessCommands, registry: &Registry, format: OutputFormat) -> Result<()> {
    match cmd {
        AccessCommands::List { app, user } => {
            let filter = GrantFilter {
                application_id: app.map(ApplicationId::new),
                user_id: user.map(UserId::new),
            };
            let grants = registry.list_grants(&filter);

            let rows: Vec<GrantRow> = grants
                .iter()
                .map(|d| GrantRow {
                    id: d.grant.id.to_string(),
                    user: d.user_name.clone(),
                    application: d.application_name.clone(),
                    level: d.access_level_name.clone(),
                    custom: d.grant.custom_permissions.len(),
                    granted_by: d.grant.granted_by.clone(),
                    granted_at: d.grant.granted_at.format("%Y-%m-%d").to_string(),
                    expires_at: d
                        .grant
                        .expires_at
                        .map(|at| at.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "never".to_string()),
                })
                .collect();

            output::print_list(&rows, &grants, format)?;
        }

        AccessCommands::Effective { user, app } => {
            let permissions =
                registry.effective_permissions(&UserId::new(user), &ApplicationId::new(app))?;

            let rows: Vec<EffectiveRow> = permissions
                .iter()
                .map(|perm| EffectiveRow {
                    id: perm.id.to_string(),
                    name: perm.name.clone(),
                    key: perm.key(),
                })
                .collect();

            output::print_list(&rows, &permissions, format)?;
        }
    }

    Ok(())
}
