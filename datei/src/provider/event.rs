//! Change events published by active watches.

use std::fmt;

use crate::uri::ResourceUri;

/// What happened to a watched resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        })
    }
}

/// A (kind, identifier) notification of a filesystem mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    pub kind: ChangeKind,
    pub uri: ResourceUri,
}

impl FileChangeEvent {
    pub fn new(kind: ChangeKind, uri: ResourceUri) -> Self {
        Self { kind, uri }
    }
}

impl fmt::Display for FileChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.uri)
    }
}
