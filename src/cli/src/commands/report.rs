//! Access report commands.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;
use tabled::Tabled;

use warden_core::models::ApplicationId;
use warden_core::registry::Registry;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Show who can access an application, grouped by access level
    Show {
        /// Application ID
        app: String,
    },

    /// Write the report as JSON
    Export {
        /// Application ID
        app: String,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Access Level")]
    level: String,
    #[tabled(rename = "Users")]
    count: usize,
    #[tabled(rename = "Members")]
    members: String,
}

pub fn execute(cmd: ReportCommands, registry: &Registry, format: OutputFormat) -> Result<()> {
    match cmd {
        ReportCommands::Show { app } => {
            let report = registry.generate_access_report(&ApplicationId::new(app))?;

            match format {
                OutputFormat::Table => {
                    output::print_header(&format!("Access Report: {}", report.application_name));
                    output::print_detail("Total Users", &report.total_users.to_string());
                    output::print_detail(
                        "Generated",
                        &report.report_generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    );
                    output::print_detail(
                        "Custom Permissions",
                        &report.custom_permissions.len().to_string(),
                    );
                    println!();

                    let rows: Vec<LevelRow> = report
                        .users_by_access_level
                        .iter()
                        .map(|usage| LevelRow {
                            level: usage.access_level_name.clone(),
                            count: usage.user_count,
                            members: usage
                                .users
                                .iter()
                                .map(|u| u.name.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                        })
                        .collect();
                    output::print_list(&rows, &report, format)?;
                }
                _ => output::print_item(&report, format)?,
            }
        }

        ReportCommands::Export { app, dir } => {
            let report = registry.generate_access_report(&ApplicationId::new(app))?;
            let path = dir.join(report.export_file_name());
            let json = serde_json::to_string_pretty(&report.to_export())
                .context("Failed to serialize report")?;
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("Report written to {}", path.display()));
                }
                _ => output::print_item(
                    &serde_json::json!({ "path": path, "totalUsers": report.total_users }),
                    format,
                )?,
            }
        }
    }

    Ok(())
}
