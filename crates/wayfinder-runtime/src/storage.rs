#![forbid(unsafe_code)]

//! String-keyed persistence backends.
//!
//! The tour engine only needs `get`/`set`/`remove` of string values, which
//! is what a browser's `localStorage` offers. Native hosts use
//! [`MemoryStorage`] or the JSON-file backed [`FileStorage`].
//!
//! All backends take `&self`: hosts are single-threaded and share one
//! backend between every tour through an `Rc`.

use std::cell::RefCell;
use std::collections::BTreeMap;
#[cfg(feature = "file-storage")]
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be reached (e.g. storage disabled by the
    /// browser, missing window).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The backing store refused a write (quota, permissions).
    #[error("storage write rejected for key {key:?}: {reason}")]
    WriteRejected { key: String, reason: String },
    /// File I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file exists but is not a JSON string map.
    #[error("storage file is not a JSON object of strings: {0}")]
    Format(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed get/set capability.
pub trait StorageBackend {
    /// Read the value stored at `key`, `Ok(None)` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: StorageBackend + ?Sized> StorageBackend for std::rc::Rc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-memory backend. Values are lost when the backend is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// JSON-file backend: the whole file is one `{ "key": "value", ... }`
/// object, reread on every access and rewritten atomically
/// (temp file, then rename) on every mutation.
///
/// A missing file reads as empty.
#[cfg(feature = "file-storage")]
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

#[cfg(feature = "file-storage")]
impl FileStorage {
    /// Use `path` as the backing file. The parent directory must exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(feature = "file-storage")]
impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("a").unwrap(), None);
        storage.set("a", "1").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        storage.set("a", "2").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);
        storage.remove("a").unwrap();
        storage.remove("a").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn rc_backend_delegates() {
        let storage = std::rc::Rc::new(MemoryStorage::new());
        let shared: std::rc::Rc<dyn StorageBackend> = storage.clone();
        shared.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }

    #[cfg(feature = "file-storage")]
    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("tours.json"));

        assert_eq!(storage.get("tour-a").unwrap(), None);
        storage.set("tour-a", r#"{"step":1}"#).unwrap();
        storage.set("tour-b", "x").unwrap();

        let reopened = FileStorage::new(storage.path());
        assert_eq!(
            reopened.get("tour-a").unwrap().as_deref(),
            Some(r#"{"step":1}"#)
        );
        reopened.remove("tour-b").unwrap();
        assert_eq!(storage.get("tour-b").unwrap(), None);
        assert!(!dir.path().join("tours.json.tmp").exists());
    }

    #[cfg(feature = "file-storage")]
    #[test]
    fn file_with_garbage_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tours.json");
        std::fs::write(&path, "not json {{{").unwrap();
        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get("x"), Err(StorageError::Format(_))));
    }
}
