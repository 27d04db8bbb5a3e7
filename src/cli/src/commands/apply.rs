//! Run a script of registry commands.
//!
//! A script is a JSON or YAML list of commands, each shaped like
//! `{"type": "GRANT_ACCESS", "payload": {...}}`.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::Tabled;

use warden_core::command::{Command, CommandOutcome};
use warden_core::registry::Registry;

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ApplyArgs {
    /// Script file (.json, .yaml or .yml)
    script: PathBuf,

    /// Write the resulting dataset to this file (.json or .toml)
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Result")]
    summary: String,
}

#[derive(Serialize)]
struct Applied<'a> {
    step: usize,
    command: &'static str,
    outcome: &'a CommandOutcome,
}

fn load_script(path: &Path) -> Result<Vec<Command>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );

    let commands = if is_yaml {
        serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML script")?
    } else {
        serde_json::from_str(&content).with_context(|| "Failed to parse JSON script")?
    };
    Ok(commands)
}

pub fn execute(args: ApplyArgs, registry: &Registry, format: OutputFormat) -> Result<()> {
    let commands = load_script(&args.script)?;
    tracing::debug!(script = %args.script.display(), commands = commands.len(), "Script loaded");

    let mut rows = Vec::with_capacity(commands.len());
    let mut outcomes = Vec::with_capacity(commands.len());

    for (index, command) in commands.into_iter().enumerate() {
        let kind = command.kind();
        let dispatched = registry
            .dispatch(command)
            .with_context(|| format!("Step {} ({}) failed", index + 1, kind))?;
        rows.push(OutcomeRow {
            step: index + 1,
            command: kind.to_string(),
            summary: dispatched.outcome.summary(),
        });
        outcomes.push((kind, dispatched.outcome));
    }

    let applied: Vec<Applied<'_>> = outcomes
        .iter()
        .enumerate()
        .map(|(index, (kind, outcome))| Applied {
            step: index + 1,
            command: kind.as_str(),
            outcome,
        })
        .collect();
    output::print_list(&rows, &applied, format)?;

    if let Some(path) = args.dump {
        registry.export_seed().write_to(&path)?;
        if let OutputFormat::Table = format {
            output::print_success(&format!("Dataset written to {}", path.display()));
        }
    }

    Ok(())
}
