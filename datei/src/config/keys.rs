//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::uri::validate_scheme;

/// Every setting that can be read or written by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ProviderScheme,
    ProviderCaseSensitive,
    WatchRecursive,
    WatchExcludes,
    WatchEventCapacity,
    LoggingLevel,
    LoggingFile,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ProviderScheme,
            ConfigKey::ProviderCaseSensitive,
            ConfigKey::WatchRecursive,
            ConfigKey::WatchExcludes,
            ConfigKey::WatchEventCapacity,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
            ConfigKey::LoggingDirectory,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ProviderScheme | ConfigKey::ProviderCaseSensitive => "provider",
            ConfigKey::WatchRecursive
            | ConfigKey::WatchExcludes
            | ConfigKey::WatchEventCapacity => {
                "watch"
            }
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile | ConfigKey::LoggingDirectory => {
                "logging"
            }
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ProviderScheme => "scheme",
            ConfigKey::ProviderCaseSensitive => "case_sensitive",
            ConfigKey::WatchRecursive => "recursive",
            ConfigKey::WatchExcludes => "excludes",
            ConfigKey::WatchEventCapacity => "event_capacity",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as it would appear in the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ProviderScheme => config.provider.scheme.clone(),
            ConfigKey::ProviderCaseSensitive => config.provider.case_sensitive.to_string(),
            ConfigKey::WatchRecursive => config.watch.recursive.to_string(),
            ConfigKey::WatchExcludes => config.watch.excludes.join(", "),
            ConfigKey::WatchEventCapacity => config.watch.event_capacity.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config.logging.file.to_string(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Parse `value` and store it.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when the text does not parse for this key.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::ProviderScheme => {
                validate_scheme(value).map_err(|e| self.invalid(value, e.to_string()))?;
                config.provider.scheme = value.to_string();
            }
            ConfigKey::ProviderCaseSensitive => {
                config.provider.case_sensitive = self.parse_bool(value)?;
            }
            ConfigKey::WatchRecursive => {
                config.watch.recursive = self.parse_bool(value)?;
            }
            ConfigKey::WatchExcludes => {
                config.watch.excludes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            ConfigKey::WatchEventCapacity => {
                let capacity: usize = value
                    .parse()
                    .map_err(|e: std::num::ParseIntError| self.invalid(value, e.to_string()))?;
                if capacity == 0 {
                    return Err(self.invalid(value, "must be at least 1".to_string()));
                }
                config.watch.event_capacity = capacity;
            }
            ConfigKey::LoggingLevel => {
                if value.is_empty() {
                    return Err(self.invalid(value, "must not be empty".to_string()));
                }
                config.logging.level = value.to_string();
            }
            ConfigKey::LoggingFile => {
                config.logging.file = self.parse_bool(value)?;
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = PathBuf::from(value);
            }
        }
        Ok(())
    }

    fn parse_bool(&self, value: &str) -> Result<bool, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false".to_string())),
        }
    }

    fn invalid(&self, value: &str, reason: String) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
