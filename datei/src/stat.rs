//! Resource metadata and directory entries.

use std::fs::{FileType, Metadata};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Kind of filesystem entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Directory,
    /// A link whose target does not resolve. Links that resolve report
    /// their target's kind.
    SymbolicLink,
    /// Sockets, FIFOs, devices.
    Unknown,
}

impl FileKind {
    /// Classify a native file type.
    pub fn from_file_type(file_type: &FileType) -> Self {
        if file_type.is_symlink() {
            FileKind::SymbolicLink
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Unknown
        }
    }
}

/// Metadata for a resource, built fresh from a native stat on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileStat {
    /// What the resource is.
    pub kind: FileKind,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time in milliseconds since the Unix epoch.
    pub mtime: i64,
}

impl FileStat {
    /// Build a stat of the given kind from native metadata.
    pub fn from_metadata(kind: FileKind, metadata: &Metadata) -> Self {
        Self {
            kind,
            size: metadata.len(),
            mtime: metadata.modified().map(epoch_millis).unwrap_or(0),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::SymbolicLink
    }
}

/// A child of a listed directory paired with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    /// Child name, never containing a path separator.
    pub name: String,
    /// Metadata for the child.
    pub stat: FileStat,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, stat: FileStat) -> Self {
        Self {
            name: name.into(),
            stat,
        }
    }
}

/// Milliseconds since the Unix epoch, negative for earlier times.
pub(crate) fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i64::MIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_epoch_millis_after_epoch() {
        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(epoch_millis(time), 1_700_000_000_123);
    }

    #[test]
    fn test_epoch_millis_before_epoch() {
        let time = UNIX_EPOCH - Duration::from_millis(1_500);
        assert_eq!(epoch_millis(time), -1_500);
    }

    #[test]
    fn test_file_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FileKind::SymbolicLink).unwrap();
        assert_eq!(json, "\"symbolic_link\"");
    }

    #[test]
    fn test_dir_entry_serializes_with_stat() {
        let entry = DirEntry::new(
            "a.txt",
            FileStat {
                kind: FileKind::File,
                size: 3,
                mtime: 42,
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "a.txt");
        assert_eq!(json["stat"]["kind"], "file");
        assert_eq!(json["stat"]["size"], 3);
        assert_eq!(json["stat"]["mtime"], 42);
    }
}
