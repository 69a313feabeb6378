//! Async filesystem façade.
//!
//! Every native primitive the provider needs is exposed here as a single
//! awaitable operation with one success value and one failure value. Native
//! I/O errors are translated into [`FsError`] in this module and nowhere else.
//!
//! | Operation     | Fails with                                        |
//! |---------------|---------------------------------------------------|
//! | [`read_dir`]  | `NotFound`, `NotADirectory`, `PermissionDenied`   |
//! | [`stat`]      | `NotFound`, `PermissionDenied`                    |
//! | [`read_file`] | `NotFound`, `IsADirectory`, `PermissionDenied`    |
//! | [`exists`]    | never                                             |

use std::path::Path;

use tracing::trace;

use crate::error::{FsError, FsResult};
use crate::stat::{FileKind, FileStat};

/// List the names of a directory's children in native listing order.
pub async fn read_dir(path: &Path) -> FsResult<Vec<String>> {
    let mut entries = tokio::fs::read_dir(path)
        .await
        .map_err(|e| FsError::from_io(path, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FsError::from_io(path, e))?
    {
        let name = entry
            .file_name()
            .into_string()
            .unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
        names.push(name);
    }

    trace!(path = %path.display(), count = names.len(), "Listed directory");
    Ok(names)
}

/// Query metadata for a path, following symlinks.
///
/// A link reports the kind, size and mtime of its target. Only a dangling
/// link, which has no target to describe, is reported as
/// [`FileKind::SymbolicLink`] with the link's own metadata.
pub async fn stat(path: &Path) -> FsResult<FileStat> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            let kind = FileKind::from_file_type(&metadata.file_type());
            Ok(FileStat::from_metadata(kind, &metadata))
        }
        Err(err) => match tokio::fs::symlink_metadata(path).await {
            Ok(link) if link.file_type().is_symlink() => {
                Ok(FileStat::from_metadata(FileKind::SymbolicLink, &link))
            }
            _ => Err(FsError::from_io(path, err)),
        },
    }
}

/// Read a file's raw bytes.
pub async fn read_file(path: &Path) -> FsResult<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            trace!(path = %path.display(), bytes = bytes.len(), "Read file");
            Ok(bytes)
        }
        Err(e) => {
            let err = FsError::from_io(path, e);
            // Some platforms refuse to open a directory rather than failing the read.
            if matches!(
                err,
                FsError::PermissionDenied { .. } | FsError::Unknown { .. }
            ) && is_directory(path).await
            {
                return Err(FsError::IsADirectory {
                    path: path.to_path_buf(),
                });
            }
            Err(err)
        }
    }
}

/// Whether a path exists. Any failure, including permission errors and
/// dangling symlinks, reads as `false`.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use proptest::prelude::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stat_file_reports_size_and_mtime() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data.bin");
        std_fs::write(&file, b"hello world").unwrap();
        filetime::set_file_mtime(&file, FileTime::from_unix_time(1_700_000_000, 250_000_000))
            .unwrap();

        let stat = stat(&file).await.unwrap();

        assert_eq!(stat.kind, FileKind::File);
        assert_eq!(stat.size, 11);
        assert_eq!(stat.mtime, 1_700_000_000_250);
    }

    #[tokio::test]
    async fn test_stat_directory() {
        let temp = TempDir::new().unwrap();
        let stat = stat(temp.path()).await.unwrap();
        assert!(stat.is_directory());
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = stat(&temp.path().join("nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stat_symlink_to_file_reports_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.txt");
        std_fs::write(&target, b"12345").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let stat = stat(&link).await.unwrap();

        assert_eq!(stat.kind, FileKind::File);
        assert_eq!(stat.size, 5);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stat_symlink_to_directory_reports_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real_dir");
        std_fs::create_dir(&target).unwrap();
        let link = temp.path().join("link_dir");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let stat = stat(&link).await.unwrap();
        assert!(stat.is_directory());
        assert!(!stat.is_symlink());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stat_dangling_symlink_still_succeeds() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("gone"), &link).unwrap();

        let stat = stat(&link).await.unwrap();
        assert_eq!(stat.kind, FileKind::SymbolicLink);
        assert!(!exists(&link).await);
    }

    #[tokio::test]
    async fn test_read_dir_matches_native_order() {
        let temp = TempDir::new().unwrap();
        for name in ["c", "a", "b"] {
            std_fs::write(temp.path().join(name), name).unwrap();
        }

        let expected: Vec<String> = std_fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();

        let names = read_dir(temp.path()).await.unwrap();
        assert_eq!(names, expected);
        assert_eq!(names.len(), 3);
    }

    #[tokio::test]
    async fn test_read_dir_on_file_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std_fs::write(&file, b"x").unwrap();

        let err = read_dir(&file).await.unwrap_err();
        assert!(matches!(err, FsError::NotADirectory { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_read_dir_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = read_dir(&temp.path().join("missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_file_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("blob");
        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std_fs::write(&file, &content).unwrap();

        assert_eq!(read_file(&file).await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_read_file_errors() {
        let temp = TempDir::new().unwrap();

        let err = read_file(&temp.path().join("missing")).await.unwrap_err();
        assert!(err.is_not_found());

        let err = read_file(temp.path()).await.unwrap_err();
        assert!(matches!(err, FsError::IsADirectory { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("here");
        std_fs::write(&file, b"").unwrap();

        assert!(exists(&file).await);
        assert!(exists(temp.path()).await);
        assert!(!exists(&temp.path().join("not-here")).await);
        assert!(!exists(&file.join("under-a-file")).await);
    }

    proptest! {
        #[test]
        fn prop_exists_never_fails_for_missing_names(name in "[a-zA-Z0-9 ._-]{1,40}") {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("absent").join(&name);
            prop_assert!(!runtime.block_on(exists(&path)));
        }
    }
}
