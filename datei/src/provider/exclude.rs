//! Exclude globs for watch subscriptions.

use std::path::Path;

use glob::Pattern;

use crate::error::{FsError, FsResult};

/// A compiled set of exclude patterns.
///
/// A path is excluded when any pattern matches either its path relative to
/// the watch root or its absolute path.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    /// Compile the given globs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` for the first glob that does not compile.
    pub fn new<S: AsRef<str>>(globs: &[S]) -> FsResult<Self> {
        let patterns = globs
            .iter()
            .map(|glob| {
                let glob = glob.as_ref();
                Pattern::new(glob).map_err(|e| FsError::InvalidPattern {
                    pattern: glob.to_string(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<FsResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `path` (under `root`) is excluded.
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(root).ok();
        self.patterns.iter().any(|pattern| {
            relative.is_some_and(|rel| pattern.matches_path(rel)) || pattern.matches_path(path)
        })
    }
}
