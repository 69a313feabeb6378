//! Watch subscriptions: native change callbacks bridged into change events.
//!
//! # Event Flow
//!
//! ```text
//! notify thread                 Tokio adapter task                 subscribers
//!      │                               │                                │
//!      ├── Event{kind, paths} ────────►├── resolve path                 │
//!      │   (unbounded channel)         ├── skip excluded                │
//!      │                               ├── content changed? → Modified  │
//!      │                               ├── renamed? → fs::exists        │
//!      │                               │     true → Created             │
//!      │                               │     false → Deleted            │
//!      │                               └── publish (if Active) ────────►│
//! ```
//!
//! The existence probe is a heuristic: the native "renamed" signal does not
//! say whether the entry appeared or disappeared, and the entry may change
//! again before the probe runs. Under rapid churn the probe reflects whatever
//! is on disk when it executes.
//!
//! # Disposal
//!
//! Publishing and disposal share one lock. Once [`WatchHandle::dispose`]
//! returns, the adapter sees [`SubscriptionState::Disposed`] and drops any
//! event still in flight.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, trace, warn};

use super::event::{ChangeKind, FileChangeEvent};
use super::exclude::ExcludeSet;
use super::WatchOptions;
use crate::error::{FsError, FsResult};
use crate::fs;
use crate::uri::ResourceUri;

/// Lifecycle of a watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Native watch running, events forwarded.
    Active,
    /// Terminal. Native handle released, nothing further is published.
    Disposed,
}

/// The two signals a native watcher can give for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NativeChange {
    /// The entry's content or attributes changed.
    Changed,
    /// The entry appeared, disappeared, or was renamed; ambiguous.
    Renamed,
}

impl NativeChange {
    /// Reduce a notify event kind to a native signal.
    ///
    /// Access and unclassified events carry no change and yield `None`, as
    /// does the paired form of a rename: its `From` and `To` halves have
    /// already been reported separately.
    fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) | EventKind::Remove(_) => Some(NativeChange::Renamed),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => None,
            EventKind::Modify(ModifyKind::Name(_)) => Some(NativeChange::Renamed),
            EventKind::Modify(_) | EventKind::Any => Some(NativeChange::Changed),
            EventKind::Access(_) | EventKind::Other => None,
        }
    }
}

/// Shared between the handle and its adapter task.
struct Subscription {
    root: ResourceUri,
    state: Mutex<SubscriptionState>,
    events: broadcast::Sender<FileChangeEvent>,
}

impl Subscription {
    /// Publish one event unless the subscription has been disposed.
    ///
    /// Returns `false` once disposed.
    fn publish(&self, event: FileChangeEvent) -> bool {
        let state = self.state.lock();
        if *state != SubscriptionState::Active {
            return false;
        }
        trace!(event = %event, "Publishing change event");
        // No receivers is not an error; the host may subscribe later.
        let _ = self.events.send(event);
        true
    }
}

/// A live watch bound to one root resource.
///
/// Owns exactly one native watcher and one adapter task. Dropping the handle
/// disposes it.
pub struct WatchHandle {
    subscription: Arc<Subscription>,
    watcher: Option<RecommendedWatcher>,
    task: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Establish a native watch rooted at `root` and start its adapter.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn start(
        root: ResourceUri,
        options: &WatchOptions,
        events: broadcast::Sender<FileChangeEvent>,
    ) -> FsResult<Self> {
        let root_path = root.path().to_path_buf();
        let excludes = ExcludeSet::new(&options.excludes)?;

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| FsError::Unknown {
            path: root_path.clone(),
            source: Box::new(e),
        })?;

        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Receiver gone means the subscription was disposed.
            let _ = raw_tx.send(res);
        })
        .map_err(|e| FsError::from_notify(&root_path, e))?;

        let mode = if options.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&root_path, mode)
            .map_err(|e| FsError::from_notify(&root_path, e))?;

        let subscription = Arc::new(Subscription {
            root,
            state: Mutex::new(SubscriptionState::Active),
            events,
        });

        let task = runtime.spawn(run_adapter(
            Arc::clone(&subscription),
            root_path,
            excludes,
            raw_rx,
        ));

        info!(
            root = %subscription.root,
            recursive = options.recursive,
            excludes = options.excludes.len(),
            "Watch started"
        );

        Ok(Self {
            subscription,
            watcher: Some(watcher),
            task: Some(task),
        })
    }

    /// The resource this subscription watches.
    pub fn root(&self) -> &ResourceUri {
        &self.subscription.root
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        *self.subscription.state.lock()
    }

    pub fn is_active(&self) -> bool {
        self.state() == SubscriptionState::Active
    }

    /// Stop the watch and release the native handle.
    ///
    /// No event is published after this returns. Calling it again is a no-op.
    pub fn dispose(&mut self) {
        {
            let mut state = self.subscription.state.lock();
            if *state == SubscriptionState::Disposed {
                return;
            }
            *state = SubscriptionState::Disposed;
        }

        // Dropping the watcher stops native callbacks and closes the channel.
        drop(self.watcher.take());
        if let Some(task) = self.task.take() {
            task.abort();
        }

        info!(root = %self.subscription.root, "Watch disposed");
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("root", &self.subscription.root)
            .field("state", &self.state())
            .finish()
    }
}

/// Consume raw native events until the watcher is dropped.
async fn run_adapter(
    subscription: Arc<Subscription>,
    root_path: PathBuf,
    excludes: ExcludeSet,
    mut raw_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
) {
    while let Some(result) = raw_rx.recv().await {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!(root = %subscription.root, error = %e, "Native watcher error");
                continue;
            }
        };

        let Some(native) = NativeChange::from_event_kind(&event.kind) else {
            continue;
        };

        for reported in &event.paths {
            let path = resolve_changed_path(&root_path, reported);
            if excludes.is_excluded(&root_path, &path) {
                trace!(path = %path.display(), "Skipping excluded path");
                continue;
            }

            let kind = classify(native, &path).await;
            let change = FileChangeEvent::new(kind, subscription.root.with_path(&path));
            if !subscription.publish(change) {
                return;
            }
        }
    }
}

/// Absolute path of a changed entry: the watch root joined with the reported name.
fn resolve_changed_path(root: &Path, reported: &Path) -> PathBuf {
    if reported.is_absolute() {
        reported.to_path_buf()
    } else {
        root.join(reported)
    }
}

async fn classify(native: NativeChange, path: &Path) -> ChangeKind {
    match native {
        NativeChange::Changed => ChangeKind::Modified,
        NativeChange::Renamed => {
            if fs::exists(path).await {
                ChangeKind::Created
            } else {
                ChangeKind::Deleted
            }
        }
    }
}
