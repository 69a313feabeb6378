//! Configuration file support.
//!
//! Settings live in `~/.datei/config.ini`. A missing file means defaults;
//! a present file only needs the keys it wants to override.
//!
//! ```ini
//! [provider]
//! scheme = datei
//! case_sensitive = false
//!
//! [watch]
//! recursive = true
//! excludes = **/.git/**, **/target/**
//! event_capacity = 1024
//!
//! [logging]
//! level = info
//! file = false
//! directory = /home/amy/.datei/logs
//! ```

mod keys;

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::provider::{ProviderConfig, WatchOptions, DEFAULT_EVENT_CAPACITY};
use crate::uri::SCHEME;

pub use keys::ConfigKey;

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".datei";

/// Name of the configuration file inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors from loading, saving, or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

/// `[provider]` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSettings {
    pub scheme: String,
    pub case_sensitive: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            scheme: SCHEME.to_string(),
            case_sensitive: false,
        }
    }
}

/// `[watch]` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchSettings {
    pub recursive: bool,
    pub excludes: Vec<String>,
    pub event_capacity: usize,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            recursive: true,
            excludes: Vec::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// `[logging]` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Also write logs to a file under `directory`.
    pub file: bool,
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
            directory: config_dir()
                .map(|dir| dir.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs")),
        }
    }
}

/// The whole configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub provider: ProviderSettings,
    pub watch: WatchSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location, or defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path().ok_or(ConfigError::NoHomeDirectory)?;
        Self::load_from(&path)
    }

    /// Load from `path`, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_file_path().ok_or(ConfigError::NoHomeDirectory)?;
        self.save_to(&path)
    }

    /// Save every key to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path).map_err(write_err)
    }

    /// Provider configuration derived from these settings.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            scheme: self.provider.scheme.clone(),
            case_sensitive: self.provider.case_sensitive,
            event_capacity: self.watch.event_capacity.max(1),
        }
    }

    /// Default watch options derived from these settings.
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            recursive: self.watch.recursive,
            excludes: self.watch.excludes.clone(),
        }
    }
}

/// `~/.datei`, if a home directory is known.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
}

/// `~/.datei/config.ini`, if a home directory is known.
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
