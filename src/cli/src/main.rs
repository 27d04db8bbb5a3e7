//! Warden CLI - inspect and change an access-control registry.
//!
//! The registry is loaded from the built-in sample dataset or a seed file,
//! and every command runs against that in-process registry.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use warden_core::config::Config;
use warden_core::registry::Registry;
use warden_core::telemetry;

use commands::{access, apply, apps, config, levels, permissions, report, stats, users};
use output::OutputFormat;

/// Warden - access-control registry
#[derive(Parser)]
#[command(
    name = "warden",
    version,
    about = "Warden - access-control registry",
    long_about = "Inspect users, applications, access levels and grants, \
                  generate access reports, and apply scripted changes.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Seed dataset (.json or .toml)
    #[arg(long, global = true, env = "WARDEN_SEED")]
    seed: Option<PathBuf>,

    /// Registry configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User operations
    #[command(subcommand)]
    Users(users::UsersCommands),

    /// Application operations
    #[command(subcommand)]
    Apps(apps::AppsCommands),

    /// Access level operations
    #[command(subcommand)]
    Levels(levels::LevelsCommands),

    /// Permission catalog operations
    #[command(subcommand)]
    Permissions(permissions::PermissionsCommands),

    /// Grant operations
    #[command(subcommand)]
    Access(access::AccessCommands),

    /// Access reports
    #[command(subcommand)]
    Report(report::ReportCommands),

    /// Dashboard statistics
    Stats(stats::StatsArgs),

    /// Apply a script of commands
    Apply(apply::ApplyArgs),

    /// CLI preferences
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

fn load_config(path: Option<PathBuf>, seed: Option<PathBuf>, verbose: u8) -> Result<Config> {
    let path = path.or_else(|| config::load_path(config::CONFIG_KEY));

    let mut cfg = match path {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    if let Some(seed) = seed.or_else(|| config::load_path(config::SEED_KEY)) {
        cfg.registry.seed_path = Some(seed);
    }

    cfg.observability.log_level = match verbose {
        0 => "warn".to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };

    Ok(cfg)
}

fn run(cli: Cli) -> Result<()> {
    let format = cli.output;

    // Preferences do not need a registry.
    let command = match cli.command {
        Commands::Config(cmd) => return config::execute(cmd, format),
        command => command,
    };

    let cfg = load_config(cli.config, cli.seed, cli.verbose)?;
    // A subscriber may already be installed; carry on without ours.
    let _ = telemetry::init_logging(&cfg.observability.logging());

    let registry = Registry::from_config(&cfg).context("Failed to load registry")?;
    tracing::debug!(?registry, "Registry ready");

    match command {
        Commands::Users(cmd) => users::execute(cmd, &registry, format),
        Commands::Apps(cmd) => apps::execute(cmd, &registry, format),
        Commands::Levels(cmd) => levels::execute(cmd, &registry, format),
        Commands::Permissions(cmd) => permissions::execute(cmd, &registry, format),
        Commands::Access(cmd) => access::execute(cmd, &registry, format),
        Commands::Report(cmd) => report::execute(cmd, &registry, format),
        Commands::Stats(args) => stats::execute(args, &registry, format),
        Commands::Apply(args) => apply::execute(args, &registry, format),
        Commands::Config(cmd) => config::execute(cmd, format),
    }
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
