//! File stores
//!
//! A [`FileStore`] is the only thing the layer reads from or writes to. Paths
//! are relative to the store root; keys are always `/`-separated so the same
//! project looks identical in memory and on disk.

use crate::error::FileError;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Read/write access to the files of one generated project
pub trait FileStore {
    /// Full text of the file at `path`
    ///
    /// # Errors
    /// [`FileError::NotFound`] if absent, [`FileError::Io`] otherwise
    fn read(&self, path: &Path) -> Result<String, FileError>;

    /// Replace the file at `path` with `contents`, creating it if needed
    ///
    /// # Errors
    /// [`FileError::Io`] if the write fails
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), FileError>;

    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Every file in the store as a `/`-separated relative path, sorted
    ///
    /// # Errors
    /// [`FileError::Io`] if the store cannot be listed
    fn paths(&self) -> Result<Vec<String>, FileError>;
}

/// `/`-separated key for a relative path
///
/// `.` components are dropped and `..` pops the previous component.
#[must_use]
pub fn store_key(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.join("/")
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFileStore {
    files: BTreeMap<String, String>,
}

impl MemoryFileStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a file
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.files
            .insert(store_key(path.as_ref()), contents.into());
        self
    }

    /// Text of a file, if present
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(&store_key(path.as_ref())).map(String::as_str)
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store holds no files
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileStore for MemoryFileStore {
    fn read(&self, path: &Path) -> Result<String, FileError> {
        self.files
            .get(&store_key(path))
            .cloned()
            .ok_or_else(|| FileError::NotFound(path.to_path_buf()))
    }

    fn write(&mut self, path: &Path, contents: &str) -> Result<(), FileError> {
        self.files.insert(store_key(path), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&store_key(path))
    }

    fn paths(&self) -> Result<Vec<String>, FileError> {
        Ok(self.files.keys().cloned().collect())
    }
}

/// Store backed by a directory on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    /// Store rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a relative path
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl FileStore for DiskFileStore {
    fn read(&self, path: &Path) -> Result<String, FileError> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full).map_err(|e| FileError::from_io(full, e))
    }

    fn write(&mut self, path: &Path, contents: &str) -> Result<(), FileError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FileError::io_error(parent, e))?;
        }
        std::fs::write(&full, contents).map_err(|e| FileError::io_error(full, e))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn paths(&self) -> Result<Vec<String>, FileError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map_or_else(|| self.root.clone(), Path::to_path_buf);
                FileError::io_error(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                paths.push(store_key(relative));
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_key_is_slash_separated() {
        assert_eq!(
            store_key(Path::new("src/main/java/./com/../com/App.java")),
            "src/main/java/com/App.java"
        );
    }

    #[test]
    fn memory_store_read_write() {
        let mut store = MemoryFileStore::new().with_file("a/b.txt", "one");
        assert_eq!(store.read(Path::new("a/b.txt")).unwrap(), "one");

        store.write(Path::new("./a/b.txt"), "two").unwrap();
        assert_eq!(store.get("a/b.txt"), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_missing_file() {
        let store = MemoryFileStore::new();
        assert!(!store.exists(Path::new("nope")));
        assert!(matches!(
            store.read(Path::new("nope")),
            Err(FileError::NotFound(_))
        ));
    }

    #[test]
    fn disk_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskFileStore::new(dir.path());

        store.write(Path::new("x/y/z.txt"), "hello").unwrap();

        assert!(store.exists(Path::new("x/y/z.txt")));
        assert_eq!(store.read(Path::new("x/y/z.txt")).unwrap(), "hello");
        assert_eq!(store.paths().unwrap(), vec!["x/y/z.txt".to_string()]);
    }

    #[test]
    fn disk_store_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path());
        assert!(matches!(
            store.read(Path::new("absent.txt")),
            Err(FileError::NotFound(_))
        ));
    }

    #[test]
    fn disk_store_paths_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskFileStore::new(dir.path());
        store.write(Path::new("b.txt"), "").unwrap();
        store.write(Path::new("a/c.txt"), "").unwrap();

        assert_eq!(
            store.paths().unwrap(),
            vec!["a/c.txt".to_string(), "b.txt".to_string()]
        );
    }
}
