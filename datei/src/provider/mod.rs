//! Virtual filesystem provider contract and its local-disk implementation.
//!
//! The host addresses resources by [`ResourceUri`] and expects a fixed
//! capability set from every provider it registers. [`FileSystemProvider`]
//! models that set as a trait; [`DateiFileSystemProvider`] implements it on
//! top of the [`crate::fs`] façade.
//!
//! # Architecture
//!
//! ```text
//! Host                      DateiFileSystemProvider              crate::fs / notify
//!  │                                 │                                   │
//!  ├── stat(uri) ───────────────────►├── fs::stat(path) ─────────────────►│
//!  ├── read_directory(uri) ─────────►├── fs::read_dir + fs::stat (seq) ──►│
//!  ├── read_file(uri) ──────────────►├── fs::read_file ──────────────────►│
//!  ├── write/delete/rename/mkdir ───►└── Err(Unsupported)                 │
//!  │                                                                     │
//!  ├── watch(uri) ──────────────────► WatchHandle ◄── native callbacks ◄─┤
//!  │                                      │ classify (+ fs::exists probe)
//!  │◄── subscribe() ◄── broadcast ◄───────┘
//! ```
//!
//! # Dyn Compatibility
//!
//! Async methods return [`BoxFuture`] so hosts can hold providers as
//! `Arc<dyn FileSystemProvider>`.

mod event;
mod exclude;
mod local;
mod watch;

use std::future::Future;
use std::pin::Pin;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::error::FsResult;
use crate::stat::{DirEntry, FileStat};
use crate::uri::ResourceUri;

pub use event::{ChangeKind, FileChangeEvent};
pub use exclude::ExcludeSet;
pub use local::{DateiFileSystemProvider, ProviderConfig, DEFAULT_EVENT_CAPACITY};
pub use watch::{SubscriptionState, WatchHandle};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Options accepted by [`FileSystemProvider::write_file`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteFileOptions {
    pub create: bool,
    pub overwrite: bool,
}

/// Options accepted by [`FileSystemProvider::delete`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    pub recursive: bool,
}

/// Options accepted by [`FileSystemProvider::rename`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOptions {
    pub overwrite: bool,
}

/// Options accepted by [`FileSystemProvider::watch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchOptions {
    /// Watch the whole subtree rather than direct children only.
    pub recursive: bool,
    /// Glob patterns for paths whose changes are not reported.
    pub excludes: Vec<String>,
}

impl WatchOptions {
    /// Recursive watch without excludes.
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            excludes: Vec::new(),
        }
    }

    /// Add an exclude glob.
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }
}

/// The capability set a host requires from a filesystem provider.
///
/// The trait is total: mutations a provider does not support are still
/// methods, and must fail with [`crate::FsError::Unsupported`] rather than
/// silently succeeding.
///
/// Every data operation takes a [`CancellationToken`]. Providers may check it
/// between native calls but are not required to abort a native call in flight.
pub trait FileSystemProvider: Send + Sync {
    /// Metadata for a resource.
    ///
    /// # Errors
    ///
    /// `NotFound` must stay distinct from other failures so the host can
    /// react to a vanished resource.
    fn stat(
        &self,
        uri: &ResourceUri,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<FileStat>>;

    /// Children of a directory paired with their metadata, in listing order.
    fn read_directory(
        &self,
        uri: &ResourceUri,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<Vec<DirEntry>>>;

    /// Raw contents of a file.
    fn read_file(
        &self,
        uri: &ResourceUri,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<Vec<u8>>>;

    /// Create a directory.
    fn create_directory(
        &self,
        uri: &ResourceUri,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>>;

    /// Write a file's contents.
    fn write_file(
        &self,
        uri: &ResourceUri,
        content: &[u8],
        options: WriteFileOptions,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>>;

    /// Delete a file or directory.
    fn delete(
        &self,
        uri: &ResourceUri,
        options: DeleteOptions,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>>;

    /// Rename or move a resource.
    fn rename(
        &self,
        old_uri: &ResourceUri,
        new_uri: &ResourceUri,
        options: RenameOptions,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>>;

    /// Start watching a resource.
    ///
    /// Setup failures are returned here rather than producing a subscription
    /// that never fires.
    fn watch(&self, uri: &ResourceUri, options: WatchOptions) -> FsResult<WatchHandle>;

    /// Subscribe to change events from every active watch on this provider.
    fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent>;
}
