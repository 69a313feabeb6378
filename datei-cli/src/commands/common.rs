//! Common helpers shared across CLI commands.

use std::path::Path;

use chrono::{Local, TimeZone};
use datei::{FileKind, ResourceUri, UriError};

use crate::error::CliError;

/// Resolve a command-line target to a resource identifier.
///
/// Accepts either a full identifier (`datei:/var/log`) or a filesystem path,
/// which is made absolute against the current directory and placed under
/// `default_scheme`.
pub fn resolve_target(target: &str, default_scheme: &str) -> Result<ResourceUri, CliError> {
    match ResourceUri::parse(target) {
        Ok(uri) => Ok(uri),
        Err(UriError::MissingScheme(_)) | Err(UriError::InvalidScheme(_)) => {
            let path = std::path::absolute(Path::new(target))?;
            Ok(ResourceUri::new(default_scheme, path)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Single-character kind marker for listings.
pub fn kind_marker(kind: FileKind) -> char {
    match kind {
        FileKind::File => '-',
        FileKind::Directory => 'd',
        FileKind::SymbolicLink => 'l',
        FileKind::Unknown => '?',
    }
}

/// Human-readable name of a kind.
pub fn kind_name(kind: FileKind) -> &'static str {
    match kind {
        FileKind::File => "file",
        FileKind::Directory => "directory",
        FileKind::SymbolicLink => "symbolic link",
        FileKind::Unknown => "unknown",
    }
}

/// Format epoch milliseconds in local time.
pub fn format_mtime(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
