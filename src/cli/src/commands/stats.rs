//! Dashboard statistics.

use anyhow::Result;
use clap::Args;
use tabled::Tabled;

use warden_core::models::ApplicationId;
use warden_core::registry::Registry;

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct StatsArgs {
    /// Usage of one application instead of the dashboard
    #[arg(short, long)]
    app: Option<String>,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Access Level")]
    level: String,
    #[tabled(rename = "Granted")]
    granted_at: String,
}

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Access Level")]
    level: String,
    #[tabled(rename = "Grants")]
    grants: usize,
}

pub fn execute(args: StatsArgs, registry: &Registry, format: OutputFormat) -> Result<()> {
    match args.app {
        Some(id) => {
            let stats = registry.application_stats(&ApplicationId::new(id))?;
            match format {
                OutputFormat::Table => {
                    output::print_header(&format!("Application {}", stats.application_id));
                    output::print_detail("Active Grants", &stats.total_users.to_string());
                    println!();
                    let rows: Vec<UsageRow> = stats
                        .usage
                        .iter()
                        .map(|c| UsageRow {
                            level: c.access_level_name.clone(),
                            grants: c.grants,
                        })
                        .collect();
                    output::print_list(&rows, &stats, format)?;
                }
                _ => output::print_item(&stats, format)?,
            }
        }
        None => {
            let stats = registry.dashboard_stats();
            match format {
                OutputFormat::Table => {
                    output::print_header("Dashboard");
                    output::print_detail("Total Users", &stats.total_users.to_string());
                    output::print_detail(
                        "Active Applications",
                        &stats.active_applications.to_string(),
                    );
                    output::print_detail("Access Levels", &stats.access_level_count.to_string());
                    output::print_detail("Active Grants", &stats.active_grants.to_string());
                    output::print_header("Recent Activity");
                    let rows: Vec<RecentRow> = stats
                        .recent_grants
                        .iter()
                        .map(|d| RecentRow {
                            user: d.user_name.clone(),
                            application: d.application_name.clone(),
                            level: d.access_level_name.clone(),
                            granted_at: d.grant.granted_at.format("%Y-%m-%d").to_string(),
                        })
                        .collect();
                    output::print_list(&rows, &stats, format)?;
                }
                _ => output::print_item(&stats, format)?,
            }
        }
    }

    Ok(())
}
