//! Store snapshots
//!
//! Captures the files of a store whose paths match a filter. Used to check
//! that a repeated insertion left a project byte-for-byte unchanged.

use crate::error::FileError;
use crate::store::FileStore;
use needle_core::ContentHash;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One captured file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    /// Content fingerprint
    pub hash: ContentHash,
    /// Full text
    pub contents: String,
}

/// Files of a store at a point in time, keyed by `/`-separated path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    files: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    /// Capture every file whose path matches `filter` (all files when `None`)
    ///
    /// # Errors
    /// Propagates store listing and read failures
    pub fn capture<S: FileStore + ?Sized>(
        store: &S,
        filter: Option<&Regex>,
    ) -> Result<Self, FileError> {
        let mut files = BTreeMap::new();
        for path in store.paths()? {
            if filter.is_some_and(|re| !re.is_match(&path)) {
                continue;
            }
            let contents = store.read(Path::new(&path))?;
            let hash = ContentHash::of_text(&contents);
            files.insert(path, SnapshotEntry { hash, contents });
        }
        Ok(Self { files })
    }

    /// Paths and hashes only
    #[must_use]
    pub fn state(&self) -> BTreeMap<&str, ContentHash> {
        self.files
            .iter()
            .map(|(path, entry)| (path.as_str(), entry.hash))
            .collect()
    }

    /// Captured file
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&SnapshotEntry> {
        self.files.get(path)
    }

    /// Captured paths, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Paths whose hash differs from `other`, including files only in one side
    #[must_use]
    pub fn changed_paths<'a>(&'a self, other: &'a Self) -> Vec<&'a str> {
        let mut changed: Vec<&str> = self
            .files
            .iter()
            .filter(|(path, entry)| other.files.get(*path).map(|o| o.hash) != Some(entry.hash))
            .map(|(path, _)| path.as_str())
            .collect();
        changed.extend(
            other
                .files
                .keys()
                .filter(|path| !self.files.contains_key(*path))
                .map(String::as_str),
        );
        changed.sort_unstable();
        changed
    }

    /// Number of captured files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was captured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
