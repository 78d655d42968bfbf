//! File store — the caller-facing mapping of paths to FileIds and text.
//!
//! The core performs no filesystem access: whoever drives the analysis
//! reads files and hands the text in here, keyed by path. `FileId`s are
//! stable for the lifetime of the store, so diagnostic locations from a
//! batch run can always be mapped back to a path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::base::FileId;

/// Assigns stable IDs to paths and holds file contents for analysis.
#[derive(Debug, Default)]
pub struct FileStore {
    inner: RwLock<FileStoreInner>,
}

#[derive(Debug, Default)]
struct FileStoreInner {
    /// Path → FileId mapping
    path_to_id: IndexMap<PathBuf, FileId>,
    /// FileId → Path mapping (reverse lookup)
    id_to_path: IndexMap<FileId, PathBuf>,
    /// FileId → Contents
    contents: IndexMap<FileId, Arc<str>>,
    /// Next FileId to assign
    next_id: u32,
}

impl FileStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a FileId for a path.
    pub fn file_id(&self, path: &Path) -> FileId {
        // Fast path: read lock
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        // Slow path: write lock
        let mut inner = self.inner.write();

        // Double-check
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.id_to_path.insert(id, path.to_owned());
        id
    }

    /// Register a path with its contents, returning its FileId.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Arc<str>>) -> FileId {
        let id = self.file_id(path.as_ref());
        self.set_contents(id, contents);
        id
    }

    /// Get the path for a FileId.
    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().id_to_path.get(&file).cloned()
    }

    /// Set the contents of a file.
    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) {
        self.inner.write().contents.insert(file, contents.into());
    }

    /// Get the contents of a file.
    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// Remove a file from the store.
    pub fn remove(&self, file: FileId) {
        let mut inner = self.inner.write();
        if let Some(path) = inner.id_to_path.swap_remove(&file) {
            inner.path_to_id.swap_remove(&path);
        }
        inner.contents.swap_remove(&file);
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All file IDs, in registration order.
    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().id_to_path.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_id_assignment() {
        let store = FileStore::new();

        let id1 = store.file_id(Path::new("/AppDelegate.h"));
        let id2 = store.file_id(Path::new("/ViewController.h"));
        let id3 = store.file_id(Path::new("/AppDelegate.h")); // same as id1

        assert_ne!(id1, id2);
        assert_eq!(id1, id3); // stable ID for same path
    }

    #[test]
    fn test_store_insert_and_contents() {
        let store = FileStore::new();
        let id = store.insert("/T.h", "@interface T\n@end");

        assert_eq!(store.contents(id).as_deref(), Some("@interface T\n@end"));
        assert_eq!(store.path(id).as_deref(), Some(Path::new("/T.h")));
    }

    #[test]
    fn test_store_remove() {
        let store = FileStore::new();
        let id = store.insert("/T.h", "");

        store.remove(id);
        assert!(store.contents(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_files_in_registration_order() {
        let store = FileStore::new();
        let a = store.insert("/a.h", "");
        let b = store.insert("/b.h", "");

        assert_eq!(store.files(), vec![a, b]);
    }
}
