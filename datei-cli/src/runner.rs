//! Shared setup for commands that talk to the provider.
//!
//! `CliRunner` loads configuration, installs logging, builds the Tokio
//! runtime, and activates the provider in a host registry, in that order.

use std::path::Path;
use std::sync::Arc;

use datei::config::ConfigFile;
use datei::logging;
use datei::{
    activate, DateiFileSystemProvider, FileSystemProvider, ProviderRegistry, ResourceUri,
};
use tokio::runtime::Runtime;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

use crate::error::CliError;

/// Owns everything a command needs for its lifetime.
pub struct CliRunner {
    config: ConfigFile,
    runtime: Runtime,
    registry: ProviderRegistry,
    provider: Arc<DateiFileSystemProvider>,
    // Flushes the file logger on drop.
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Bootstrap from an optional explicit config file path.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let mut config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };
        if verbose {
            config.logging.level = "debug".to_string();
        }

        let log_guard = logging::init(&config.logging)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))?;

        let mut registry = ProviderRegistry::new();
        let provider = activate(&mut registry, &config.provider_config())?;

        Ok(Self {
            config,
            runtime,
            registry,
            provider,
            _log_guard: log_guard,
        })
    }

    /// Log which command is starting.
    pub fn log_startup(&self, command: &str) {
        info!(command, version = datei::VERSION, "datei starting");
        debug!(scheme = self.provider.scheme(), "Provider ready");
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Turn a command-line target into a resource identifier.
    pub fn resolve(&self, target: &str) -> Result<ResourceUri, CliError> {
        crate::commands::common::resolve_target(target, self.provider.scheme())
    }

    /// The provider registered for `uri`'s scheme.
    pub fn provider_for(
        &self,
        uri: &ResourceUri,
    ) -> Result<Arc<dyn FileSystemProvider>, CliError> {
        self.registry
            .provider_for(uri)
            .ok_or_else(|| CliError::NoProvider(uri.scheme().to_string()))
    }
}
