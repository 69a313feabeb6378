//! Error taxonomy for filesystem operations.
//!
//! Native errors are translated into [`FsError`] exactly once, in the
//! filesystem façade. The provider never recovers from them; every failure
//! propagates unchanged so the host can decide what to show the user.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Mutating operations that the provider declares but never performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateDirectory,
    WriteFile,
    Delete,
    Rename,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateDirectory => write!(f, "createDirectory"),
            Operation::WriteFile => write!(f, "writeFile"),
            Operation::Delete => write!(f, "delete"),
            Operation::Rename => write!(f, "rename"),
        }
    }
}

/// Errors surfaced by the façade and the provider.
#[derive(Debug, Error)]
pub enum FsError {
    /// The path does not exist.
    #[error("No such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// A directory operation was attempted on something that is not one.
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// A file operation was attempted on a directory.
    #[error("Is a directory: {}", path.display())]
    IsADirectory { path: PathBuf },

    /// Access to the path was refused by the operating system.
    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The provider is read-only for this operation.
    ///
    /// Raised unconditionally by every mutation entry point.
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: Operation },

    /// The caller cancelled the operation before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// A watch exclude pattern could not be compiled.
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Any native failure not otherwise classified.
    #[error("{}: {source}", path.display())]
    Unknown {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl FsError {
    /// Translate a native I/O error for `path` into the taxonomy.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path },
            io::ErrorKind::NotADirectory => FsError::NotADirectory { path },
            io::ErrorKind::IsADirectory => FsError::IsADirectory { path },
            _ => FsError::Unknown {
                path,
                source: Box::new(err),
            },
        }
    }

    /// Translate a native watcher error for `path` into the taxonomy.
    pub fn from_notify(path: &Path, err: notify::Error) -> Self {
        match err.kind {
            notify::ErrorKind::PathNotFound => FsError::NotFound {
                path: path.to_path_buf(),
            },
            notify::ErrorKind::Io(io_err) => FsError::from_io(path, io_err),
            kind => FsError::Unknown {
                path: path.to_path_buf(),
                source: Box::new(notify::Error::new(kind)),
            },
        }
    }

    /// Build an `Unsupported` error for a mutation.
    pub fn unsupported(operation: Operation) -> Self {
        FsError::Unsupported { operation }
    }

    /// Whether this error means the resource does not exist.
    ///
    /// Hosts use this to treat a vanished resource specially, e.g. by
    /// dropping a watch on it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }

    /// Whether this error is the read-only rejection of a mutation.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, FsError::Unsupported { .. })
    }
}
