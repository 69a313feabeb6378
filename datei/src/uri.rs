//! Resource identifiers: a scheme tag plus an absolute local path.
//!
//! The textual form is `<scheme>:<absolute-path>`, e.g. `datei:/home/amy/notes.md`.
//! An empty authority (`datei:///home/amy/notes.md`) is accepted on parse and
//! normalized away.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Scheme tag under which the local filesystem provider is registered.
pub const SCHEME: &str = "datei";

/// Errors produced while building or parsing a [`ResourceUri`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// The text has no `scheme:` prefix.
    #[error("Missing scheme in '{0}'")]
    MissingScheme(String),

    /// The scheme is empty or contains characters outside `[A-Za-z0-9+.-]`.
    #[error("Invalid scheme '{0}'")]
    InvalidScheme(String),

    /// The path is not absolute on this platform.
    #[error("Path is not absolute: {0}")]
    RelativePath(String),
}

/// An opaque scheme + path address for a filesystem entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    scheme: String,
    path: PathBuf,
}

impl ResourceUri {
    /// Create an identifier, validating both the scheme and the path.
    pub fn new(scheme: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self, UriError> {
        let scheme = scheme.into();
        validate_scheme(&scheme)?;
        let path = path.into();
        if !path.is_absolute() {
            return Err(UriError::RelativePath(path.display().to_string()));
        }
        Ok(Self { scheme, path })
    }

    /// Create an identifier under the default [`SCHEME`].
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, UriError> {
        Self::new(SCHEME, path)
    }

    /// Parse `<scheme>:<absolute-path>`.
    pub fn parse(text: &str) -> Result<Self, UriError> {
        let (scheme, rest) = text
            .split_once(':')
            .ok_or_else(|| UriError::MissingScheme(text.to_string()))?;

        // A single letter before ':' is a Windows drive, not a scheme.
        if scheme.len() < 2 {
            return Err(UriError::MissingScheme(text.to_string()));
        }

        let path = match rest.strip_prefix("//") {
            Some(after_authority) => after_authority,
            None => rest,
        };
        Self::new(scheme, path)
    }

    /// The scheme tag.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The local filesystem path this identifier addresses.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Same scheme, different path.
    ///
    /// Relative paths are resolved against this identifier's path.
    pub fn with_path(&self, path: impl AsRef<Path>) -> Self {
        Self {
            scheme: self.scheme.clone(),
            path: self.path.join(path),
        }
    }

    /// Identifier for a direct child of this one.
    pub fn join(&self, name: &str) -> Self {
        self.with_path(name)
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.path.display())
    }
}

impl FromStr for ResourceUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Check a scheme against `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
pub(crate) fn validate_scheme(scheme: &str) -> Result<(), UriError> {
    let mut chars = scheme.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(UriError::InvalidScheme(scheme.to_string()))
    }
}
