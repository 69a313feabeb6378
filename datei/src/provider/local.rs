//! Local-disk filesystem provider.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::event::FileChangeEvent;
use super::watch::WatchHandle;
use super::{
    BoxFuture, DeleteOptions, FileSystemProvider, RenameOptions, WatchOptions, WriteFileOptions,
};
use crate::error::{FsError, FsResult, Operation};
use crate::fs;
use crate::stat::{DirEntry, FileStat};
use crate::uri::{ResourceUri, SCHEME};

/// Default capacity of the change-event broadcast channel.
///
/// Subscribers that fall further behind than this observe
/// `RecvError::Lagged` and should re-stat what they care about.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Provider configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Scheme the provider registers under.
    pub scheme: String,

    /// Whether the host should compare paths case-sensitively.
    pub case_sensitive: bool,

    /// Capacity of the change-event channel.
    pub event_capacity: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            scheme: SCHEME.to_string(),
            case_sensitive: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ProviderConfig {
    /// Set the scheme.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the event channel capacity (minimum 1).
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

/// Exposes the local filesystem through [`FileSystemProvider`].
///
/// Reads go straight to disk on every call; nothing is cached. Mutations are
/// declared but always rejected with `Unsupported`.
///
/// # Example
///
/// ```ignore
/// use datei::{DateiFileSystemProvider, FileSystemProvider, ResourceUri, WatchOptions};
/// use tokio_util::sync::CancellationToken;
///
/// let provider = DateiFileSystemProvider::new();
/// let uri = ResourceUri::from_path("/tmp/x")?;
///
/// let entries = provider.read_directory(&uri, &CancellationToken::new()).await?;
///
/// let mut events = provider.subscribe();
/// let _watch = provider.watch(&uri, WatchOptions::recursive())?;
/// while let Ok(event) = events.recv().await {
///     println!("{event}");
/// }
/// ```
#[derive(Debug)]
pub struct DateiFileSystemProvider {
    config: ProviderConfig,
    events: broadcast::Sender<FileChangeEvent>,
}

impl DateiFileSystemProvider {
    /// Create a provider with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProviderConfig::default())
    }

    /// Create a provider with the given configuration.
    pub fn with_config(config: ProviderConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self { config, events }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The scheme this provider serves.
    pub fn scheme(&self) -> &str {
        &self.config.scheme
    }

    /// Number of live change-stream subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for DateiFileSystemProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_not_cancelled(token: &CancellationToken) -> FsResult<()> {
    if token.is_cancelled() {
        Err(FsError::Cancelled)
    } else {
        Ok(())
    }
}

impl FileSystemProvider for DateiFileSystemProvider {
    fn stat(
        &self,
        uri: &ResourceUri,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<FileStat>> {
        let path = uri.path().to_path_buf();
        let token = token.clone();
        Box::pin(async move {
            ensure_not_cancelled(&token)?;
            debug!(path = %path.display(), "stat");
            fs::stat(&path).await
        })
    }

    fn read_directory(
        &self,
        uri: &ResourceUri,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<Vec<DirEntry>>> {
        let path = uri.path().to_path_buf();
        let token = token.clone();
        Box::pin(async move {
            ensure_not_cancelled(&token)?;
            debug!(path = %path.display(), "readDirectory");

            let names = fs::read_dir(&path).await?;

            // One child at a time, so the result keeps listing order.
            let mut entries = Vec::with_capacity(names.len());
            for name in names {
                ensure_not_cancelled(&token)?;
                let stat = fs::stat(&path.join(&name)).await?;
                entries.push(DirEntry::new(name, stat));
            }
            Ok(entries)
        })
    }

    fn read_file(
        &self,
        uri: &ResourceUri,
        token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<Vec<u8>>> {
        let path = uri.path().to_path_buf();
        let token = token.clone();
        Box::pin(async move {
            ensure_not_cancelled(&token)?;
            debug!(path = %path.display(), "readFile");
            fs::read_file(&path).await
        })
    }

    fn create_directory(
        &self,
        _uri: &ResourceUri,
        _token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>> {
        Box::pin(async { Err(FsError::unsupported(Operation::CreateDirectory)) })
    }

    fn write_file(
        &self,
        _uri: &ResourceUri,
        _content: &[u8],
        _options: WriteFileOptions,
        _token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>> {
        Box::pin(async { Err(FsError::unsupported(Operation::WriteFile)) })
    }

    fn delete(
        &self,
        _uri: &ResourceUri,
        _options: DeleteOptions,
        _token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>> {
        Box::pin(async { Err(FsError::unsupported(Operation::Delete)) })
    }

    fn rename(
        &self,
        _old_uri: &ResourceUri,
        _new_uri: &ResourceUri,
        _options: RenameOptions,
        _token: &CancellationToken,
    ) -> BoxFuture<'_, FsResult<()>> {
        Box::pin(async { Err(FsError::unsupported(Operation::Rename)) })
    }

    fn watch(&self, uri: &ResourceUri, options: WatchOptions) -> FsResult<WatchHandle> {
        WatchHandle::start(uri.clone(), &options, self.events.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.events.subscribe()
    }
}
