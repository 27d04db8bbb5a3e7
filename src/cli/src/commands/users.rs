//! User commands.

use anyhow::Result;
use clap::Subcommand;
use tabled::Tabled;

use warden_core::models::{EntityKind, User, UserId};
use warden_core::registry::Registry;
use warden_core::WardenError;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List users
    List {
        /// Only active users
        #[arg(long)]
        active: bool,
    },

    /// Show one user and the applications they can use
    Show {
        /// User ID
        id: String,
    },
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Grants")]
    grants: usize,
}

pub fn execute(cmd: UsersCommands, registry: &Registry, format: OutputFormat) -> Result<()> {
    match cmd {
        UsersCommands::List { active } => {
            let users: Vec<User> = registry
                .list_users()
                .into_iter()
                .filter(|user| !active || user.is_active)
                .collect();

            let rows: Vec<UserRow> = users
                .iter()
                .map(|user| UserRow {
                    id: user.id.to_string(),
                    name: user.name.clone(),
                    email: user.email.clone(),
                    role: user.role.clone(),
                    department: user.department.clone().unwrap_or_default(),
                    status: output::status(user.is_active),
                    grants: registry.active_grant_count(&user.id),
                })
                .collect();

            output::print_list(&rows, &users, format)?;
        }

        UsersCommands::Show { id } => {
            let id = UserId::new(id);
            let store = registry.snapshot();
            let user = store
                .user(&id)
                .ok_or_else(|| WardenError::not_found(EntityKind::User.as_str(), id.as_str()))?;
            let apps = store.query().applications_for_user(&id);

            match format {
                OutputFormat::Table => {
                    output::print_header(&format!("User: {}", user.name));
                    output::print_detail("ID", id.as_str());
                    output::print_detail("Email", &user.email);
                    output::print_detail("Role", &user.role);
                    if let Some(department) = &user.department {
                        output::print_detail("Department", department);
                    }
                    output::print_detail("Status", &output::status(user.is_active));
                    output::print_detail("Created", &user.created_at.format("%Y-%m-%d").to_string());
                    if let Some(login) = user.last_login {
                        output::print_detail("Last Login", &login.format("%Y-%m-%d").to_string());
                    }
                    let names: Vec<&str> = apps.iter().map(|app| app.name.as_str()).collect();
                    output::print_detail("Applications", &names.join(", "));
                }
                _ => output::print_item(
                    &serde_json::json!({ "user": user, "applications": apps }),
                    format,
                )?,
            }
        }
    }

    Ok(())
}
