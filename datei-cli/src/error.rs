//! CLI error type and exit codes.

use std::fmt;
use std::io;

use datei::config::ConfigError;
use datei::logging::LoggingError;
use datei::{FsError, RegistryError, UriError};

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded, saved, or understood.
    Config(String),

    /// A target argument is not a usable resource identifier.
    Uri(UriError),

    /// No provider is registered for the target's scheme.
    NoProvider(String),

    /// The provider rejected the operation.
    Fs(FsError),

    /// Provider registration failed.
    Registry(RegistryError),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// Failed to create the Tokio runtime or install a signal handler.
    Runtime(String),

    /// Writing output failed.
    Io(io::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// `2` for a missing resource, `3` for an unsupported operation,
    /// `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Fs(e) if e.is_not_found() => 2,
            CliError::Fs(e) if e.is_unsupported() => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Uri(e) => write!(f, "Invalid target: {}", e),
            CliError::NoProvider(scheme) => {
                write!(f, "No filesystem provider registered for scheme '{}'", scheme)
            }
            CliError::Fs(e) => write!(f, "{}", e),
            CliError::Registry(e) => write!(f, "Failed to register provider: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Uri(e) => Some(e),
            CliError::Fs(e) => Some(e),
            CliError::Registry(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Config(_) | CliError::NoProvider(_) | CliError::Runtime(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<UriError> for CliError {
    fn from(e: UriError) -> Self {
        CliError::Uri(e)
    }
}

impl From<FsError> for CliError {
    fn from(e: FsError) -> Self {
        CliError::Fs(e)
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        CliError::Registry(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
