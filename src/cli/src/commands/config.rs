//! CLI preference commands.
//!
//! Preferences live in `~/.warden/config.toml`. The `seed` key names the
//! dataset used when `--seed` is not given; `config` names the registry
//! configuration file used when `--config` is not given.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::output::{self, OutputFormat};

/// Key holding the default seed dataset path.
pub const SEED_KEY: &str = "seed";
/// Key holding the default registry configuration path.
pub const CONFIG_KEY: &str = "config";

const KNOWN_KEYS: [&str; 2] = [SEED_KEY, CONFIG_KEY];

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a preference
    Set {
        /// Preference key (seed or config)
        key: String,
        /// File path
        value: String,
    },

    /// Get a preference
    Get {
        /// Preference key
        key: String,
    },

    /// Show all preferences
    Show,

    /// Remove all preferences
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Persistent CLI preferences stored on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Return the path to the preferences file (`~/.warden/config.toml`).
fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".warden").join("config.toml"))
}

/// Load the preferences, returning defaults if the file does not exist.
fn load_config() -> Result<CliConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg: CliConfig =
        toml::from_str(&content).with_context(|| "Failed to parse preferences file")?;
    Ok(cfg)
}

/// Save the preferences, creating the directory if needed.
fn save_config(cfg: &CliConfig) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(cfg).context("Failed to serialize preferences")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Stored path preference, if set.
pub fn load_path(key: &str) -> Option<PathBuf> {
    load_config()
        .ok()
        .and_then(|cfg| cfg.values.get(key).map(PathBuf::from))
}

pub fn execute(cmd: ConfigCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                bail!("Unknown key '{}', expected one of: {}", key, KNOWN_KEYS.join(", "));
            }
            let path = PathBuf::from(&value);
            if !path.is_file() {
                bail!("'{}' is not a file", path.display());
            }
            let value = path
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", path.display()))?
                .display()
                .to_string();

            let mut cfg = load_config()?;
            cfg.values.insert(key.clone(), value.clone());
            save_config(&cfg)?;

            match format {
                OutputFormat::Table => output::print_success(&format!("{} = {}", key, value)),
                _ => output::print_item(&serde_json::json!({ "key": key, "value": value }), format)?,
            }
        }

        ConfigCommands::Get { key } => {
            let cfg = load_config()?;
            match cfg.values.get(&key) {
                Some(value) => match format {
                    OutputFormat::Table => println!("{}", value),
                    _ => output::print_item(
                        &serde_json::json!({ "key": key, "value": value }),
                        format,
                    )?,
                },
                None => output::print_error(&format!("Key '{}' not set", key)),
            }
        }

        ConfigCommands::Show => {
            let cfg = load_config()?;

            if cfg.values.is_empty() {
                output::print_info("No preferences set; the built-in dataset is used.");
                return Ok(());
            }

            match format {
                OutputFormat::Table => {
                    output::print_header("Preferences");
                    output::print_detail("file", &config_path()?.display().to_string());
                    for (k, v) in &cfg.values {
                        output::print_detail(k, v);
                    }
                }
                _ => output::print_item(&cfg.values, format)?,
            }
        }

        ConfigCommands::Reset { force } => {
            if !force {
                output::print_info("This will remove all CLI preferences. Use --force to confirm.");
                return Ok(());
            }

            let path = config_path()?;
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }

            output::print_success("Preferences removed");
        }
    }

    Ok(())
}
