//! Application commands.

use anyhow::Result;
use clap::Subcommand;
use tabled::Tabled;

use warden_core::models::{Application, ApplicationId, EntityKind};
use warden_core::registry::Registry;
use warden_core::WardenError;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum AppsCommands {
    /// List applications
    List {
        /// Filter by category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show one application and its users
    Show {
        /// Application ID
        id: String,
    },
}

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Levels")]
    levels: usize,
    #[tabled(rename = "Custom Permissions")]
    custom_permissions: usize,
    #[tabled(rename = "Users")]
    users: usize,
}

pub fn execute(cmd: AppsCommands, registry: &Registry, format: OutputFormat) -> Result<()> {
    match cmd {
        AppsCommands::List { category } => {
            let store = registry.snapshot();
            let apps: Vec<&Application> = store
                .applications()
                .iter()
                .filter(|app| {
                    category
                        .as_deref()
                        .map_or(true, |c| app.category.eq_ignore_ascii_case(c))
                })
                .collect();

            let rows: Vec<AppRow> = apps
                .iter()
                .map(|app| AppRow {
                    id: app.id.to_string(),
                    name: app.name.clone(),
                    category: app.category.clone(),
                    status: output::status(app.is_active),
                    levels: app.access_levels.len(),
                    custom_permissions: app.custom_permissions.len(),
                    users: store.query().users_for_application(&app.id).len(),
                })
                .collect();

            output::print_list(&rows, &apps, format)?;
        }

        AppsCommands::Show { id } => {
            let id = ApplicationId::new(id);
            let store = registry.snapshot();
            let app = store.application(&id).ok_or_else(|| {
                WardenError::not_found(EntityKind::Application.as_str(), id.as_str())
            })?;
            let users = store.query().users_for_application(&id);

            match format {
                OutputFormat::Table => {
                    output::print_header(&format!("Application: {}", app.name));
                    output::print_detail("ID", id.as_str());
                    output::print_detail("Description", &app.description);
                    if let Some(url) = &app.url {
                        output::print_detail("URL", url);
                    }
                    output::print_detail("Category", &app.category);
                    output::print_detail("Status", &output::status(app.is_active));
                    let levels: Vec<&str> =
                        app.access_levels.iter().map(|l| l.name.as_str()).collect();
                    output::print_detail("Access Levels", &levels.join(", "));
                    output::print_detail(
                        "Custom Permissions",
                        &app.custom_permissions.len().to_string(),
                    );
                    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
                    output::print_detail("Users", &names.join(", "));
                }
                _ => output::print_item(
                    &serde_json::json!({ "application": app, "users": users }),
                    format,
                )?,
            }
        }
    }

    Ok(())
}
