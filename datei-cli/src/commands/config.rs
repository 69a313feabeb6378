//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! for viewing and modifying settings from the command line. Each honors
//! the global `--config` override.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use datei::config::{config_file_path, ConfigError, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., watch.recursive)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., watch.recursive)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against `config_path`, or the default file.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_path(config_path)?;
    match command {
        ConfigCommands::Get { key } => run_get(&key, &path),
        ConfigCommands::Set { key, value } => run_set(&key, &value, &path),
        ConfigCommands::List => run_list(&path),
        ConfigCommands::Path => run_path(&path),
    }
}

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf, CliError> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => config_file_path().ok_or_else(|| ConfigError::NoHomeDirectory.into()),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'datei config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(key: &str, path: &Path) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_from(path)?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(key: &str, value: &str, path: &Path) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load_from(path)?;
    config_key.set(&mut config, value)?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), value);

    Ok(())
}

/// List all configuration settings.
fn run_list(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    if !path.exists() {
        println!("(file does not exist; defaults are in effect)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get_round_trips_through_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        run_set("watch.recursive", "false", &path).unwrap();
        assert!(path.exists());

        let config = ConfigFile::load_from(&path).unwrap();
        assert!(!config.watch.recursive);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        let err = run_set("watch.nonsense", "1", &path).unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        let err = run_set("watch.recursive", "sometimes", &path).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/etc/datei/config.ini");
        assert_eq!(resolve_path(Some(&explicit)).unwrap(), explicit);
    }
}
