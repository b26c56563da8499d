//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use bik_core::BikConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "parsing.scan_direction")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bik")
        .join("config.json")
}

/// Load the configuration used by the parse and batch commands.
///
/// An explicit path must exist. Otherwise the default file is used when
/// present, falling back to built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BikConfig> {
    if let Some(path) = config_path {
        return Ok(BikConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(BikConfig::from_file(&default_path)?)
    } else {
        Ok(BikConfig::default())
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<BikConfig> {
    if path.exists() {
        Ok(BikConfig::from_file(path)?)
    } else {
        Ok(BikConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    BikConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Look up a dotted key in the configuration serialized as JSON.
fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> anyhow::Result<&'a serde_json::Value> {
    let mut current = json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }
    Ok(current)
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;
    println!("{}", serde_json::to_string_pretty(lookup(&json, key)?)?);
    Ok(())
}

/// Replace the value at a dotted key. Only existing keys can be set.
fn apply_setting(config: &BikConfig, key: &str, value: &str) -> anyhow::Result<(BikConfig, serde_json::Value)> {
    // Bare words such as `forward` are taken as strings
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let mut json = serde_json::to_value(config)?;
    let (parent, field) = match key.rsplit_once('.') {
        Some((parent, field)) => (Some(parent), field),
        None => (None, key),
    };

    let mut current = &mut json;
    if let Some(parent) = parent {
        for part in parent.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    let Some(obj) = current.as_object_mut() else {
        anyhow::bail!("Cannot set value at non-object path");
    };
    if !obj.contains_key(field) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    obj.insert(field.to_string(), parsed_value.clone());

    let config: BikConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    Ok((config, parsed_value))
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;
    let (config, parsed_value) = apply_setting(&config, key, value)?;

    // Reject settings the parser cannot work with before saving them
    bik_core::BikParser::new(&config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'bik config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bik_core::models::config::ScanDirection;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_setting() {
        let (config, value) = apply_setting(&BikConfig::default(), "parsing.scan_direction", "forward").unwrap();
        assert_eq!(config.parsing.scan_direction, ScanDirection::Forward);
        assert_eq!(value, serde_json::json!("forward"));

        let (config, _) = apply_setting(&config, "parsing.max_creditor_lines", "3").unwrap();
        assert_eq!(config.parsing.max_creditor_lines, 3);
        assert_eq!(config.parsing.scan_direction, ScanDirection::Forward);
    }

    #[test]
    fn test_apply_setting_rejects_unknown_and_invalid() {
        let config = BikConfig::default();
        assert!(apply_setting(&config, "parsing.no_such_key", "1").is_err());
        assert!(apply_setting(&config, "nothing.here", "1").is_err());
        assert!(apply_setting(&config, "parsing.scan_direction", "sideways").is_err());
    }

    #[test]
    fn test_lookup() {
        let json = serde_json::to_value(BikConfig::default()).unwrap();
        assert_eq!(lookup(&json, "dialect.none").unwrap(), &serde_json::json!("BRAK"));
        assert!(lookup(&json, "dialect.missing").is_err());
    }
}
