//! Integration tests for watch subscriptions against the real filesystem.
//!
//! These tests drive a native watcher, so each step waits for the event it
//! expects and then checks that nothing else arrives within a quiet period.
//!
//! Run with: `cargo test --test watch_integration`

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::{sleep, timeout};

use datei::{
    ChangeKind, DateiFileSystemProvider, FileChangeEvent, FileSystemProvider, FsError,
    ResourceUri, SubscriptionState, WatchOptions,
};

/// How long to wait for an expected event.
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before concluding no further events are coming.
const QUIET_PERIOD: Duration = Duration::from_millis(400);

// ============================================================================
// Helper Functions
// ============================================================================

fn uri(path: &Path) -> ResourceUri {
    ResourceUri::from_path(path).expect("temp paths are absolute")
}

/// Canonical temp dir, so reported paths match on platforms with symlinked /tmp.
fn canonical_temp() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = fs::canonicalize(temp.path()).unwrap();
    (temp, root)
}

async fn next_event(rx: &mut broadcast::Receiver<FileChangeEvent>) -> FileChangeEvent {
    timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for change event")
        .expect("change stream closed")
}

async fn assert_quiet(rx: &mut broadcast::Receiver<FileChangeEvent>) {
    sleep(QUIET_PERIOD).await;
    match rx.try_recv() {
        Err(TryRecvError::Empty) => {}
        other => panic!("expected no further events, got {other:?}"),
    }
}

fn append(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Create, modify, delete each produce exactly one event; after dispose,
/// the same sequence produces none.
#[tokio::test]
async fn test_create_modify_delete_then_dispose() {
    let (_temp, root) = canonical_temp();
    let file = root.join("f.txt");

    let provider = DateiFileSystemProvider::new();
    let mut rx = provider.subscribe();
    let mut handle = provider
        .watch(&uri(&root), WatchOptions::recursive())
        .unwrap();
    assert_eq!(handle.state(), SubscriptionState::Active);

    fs::File::create(&file).unwrap();
    let event = next_event(&mut rx).await;
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.uri, uri(&file));
    assert_quiet(&mut rx).await;

    append(&file, b"more bytes");
    let event = next_event(&mut rx).await;
    assert_eq!(event.kind, ChangeKind::Modified);
    assert_eq!(event.uri, uri(&file));
    assert_quiet(&mut rx).await;

    fs::remove_file(&file).unwrap();
    let event = next_event(&mut rx).await;
    assert_eq!(event.kind, ChangeKind::Deleted);
    assert_eq!(event.uri, uri(&file));
    assert_quiet(&mut rx).await;

    handle.dispose();
    assert_eq!(handle.state(), SubscriptionState::Disposed);

    fs::File::create(&file).unwrap();
    append(&file, b"more bytes");
    fs::remove_file(&file).unwrap();
    assert_quiet(&mut rx).await;
}

/// A rename inside the root reports the old name gone and the new name present,
/// once each.
#[tokio::test]
async fn test_rename_reports_delete_then_create_once() {
    let (_temp, root) = canonical_temp();
    let from = root.join("a.txt");
    let to = root.join("b.txt");
    fs::write(&from, b"payload").unwrap();

    let provider = DateiFileSystemProvider::new();
    let mut rx = provider.subscribe();
    let _handle = provider
        .watch(&uri(&root), WatchOptions::recursive())
        .unwrap();

    fs::rename(&from, &to).unwrap();

    let event = next_event(&mut rx).await;
    assert_eq!(event.kind, ChangeKind::Deleted);
    assert_eq!(event.uri, uri(&from));

    let event = next_event(&mut rx).await;
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.uri, uri(&to));

    assert_quiet(&mut rx).await;
}

#[tokio::test]
async fn test_non_recursive_watch_ignores_nested_changes() {
    let (_temp, root) = canonical_temp();
    let sub = root.join("sub");
    fs::create_dir(&sub).unwrap();

    let provider = DateiFileSystemProvider::new();
    let mut rx = provider.subscribe();
    let _handle = provider
        .watch(&uri(&root), WatchOptions::default())
        .unwrap();

    fs::File::create(sub.join("x")).unwrap();
    assert_quiet(&mut rx).await;

    // Direct children are still reported.
    fs::File::create(root.join("top.txt")).unwrap();
    let event = next_event(&mut rx).await;
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.uri, uri(&root.join("top.txt")));
}

#[tokio::test]
async fn test_recursive_watch_reports_nested_changes() {
    let (_temp, root) = canonical_temp();
    let nested = root.join("sub").join("deeper");
    fs::create_dir_all(&nested).unwrap();

    let provider = DateiFileSystemProvider::new();
    let mut rx = provider.subscribe();
    let _handle = provider
        .watch(&uri(&root), WatchOptions::recursive())
        .unwrap();

    let file = nested.join("g.txt");
    fs::File::create(&file).unwrap();

    let event = next_event(&mut rx).await;
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.uri.path(), file.as_path());
}

#[tokio::test]
async fn test_excluded_paths_are_not_reported() {
    let (_temp, root) = canonical_temp();

    let provider = DateiFileSystemProvider::new();
    let mut rx = provider.subscribe();
    let _handle = provider
        .watch(&uri(&root), WatchOptions::recursive().with_exclude("*.log"))
        .unwrap();

    fs::File::create(root.join("noise.log")).unwrap();
    fs::File::create(root.join("signal.txt")).unwrap();

    let event = next_event(&mut rx).await;
    assert_eq!(event.uri.path(), root.join("signal.txt").as_path());
    assert_quiet(&mut rx).await;
}

#[tokio::test]
async fn test_every_subscriber_sees_each_event() {
    let (_temp, root) = canonical_temp();

    let provider = DateiFileSystemProvider::new();
    let mut first = provider.subscribe();
    let mut second = provider.subscribe();
    let _handle = provider
        .watch(&uri(&root), WatchOptions::recursive())
        .unwrap();

    fs::File::create(root.join("shared.txt")).unwrap();

    let a = next_event(&mut first).await;
    let b = next_event(&mut second).await;
    assert_eq!(a, b);
    assert_eq!(a.kind, ChangeKind::Created);
}

#[tokio::test]
async fn test_watch_missing_root_fails_synchronously() {
    let (_temp, root) = canonical_temp();
    let provider = DateiFileSystemProvider::new();

    let err = provider
        .watch(&uri(&root.join("not-there")), WatchOptions::recursive())
        .unwrap_err();
    assert!(err.is_not_found(), "got {err:?}");
}

#[tokio::test]
async fn test_watch_invalid_exclude_fails() {
    let (_temp, root) = canonical_temp();
    let provider = DateiFileSystemProvider::new();

    let err = provider
        .watch(&uri(&root), WatchOptions::recursive().with_exclude("[oops"))
        .unwrap_err();
    assert!(matches!(err, FsError::InvalidPattern { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_dispose_is_idempotent_and_drop_safe() {
    let (_temp, root) = canonical_temp();
    let provider = DateiFileSystemProvider::new();

    let mut handle = provider
        .watch(&uri(&root), WatchOptions::default())
        .unwrap();
    handle.dispose();
    handle.dispose();
    drop(handle);

    // A dropped, never-disposed handle releases its watch too.
    let mut rx = provider.subscribe();
    let handle = provider
        .watch(&uri(&root), WatchOptions::default())
        .unwrap();
    drop(handle);
    fs::File::create(root.join("after-drop.txt")).unwrap();
    assert_quiet(&mut rx).await;
}

#[test]
fn test_watch_outside_runtime_fails() {
    let (_temp, root) = canonical_temp();
    let provider = DateiFileSystemProvider::new();

    let err = provider
        .watch(&uri(&root), WatchOptions::recursive())
        .unwrap_err();
    assert!(matches!(err, FsError::Unknown { .. }), "got {err:?}");
}
