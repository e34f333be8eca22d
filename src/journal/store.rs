//! Flat JSON entry store.
//!
//! The entries file holds one JSON array and is the only source of truth. Every
//! [`EntryStore::append`] rewrites the whole file through a temp file and a rename,
//! so readers see either the previous array or the new one.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::journal::types::Entry;

/// Handle on the entries file. Holds no cached state; each call goes to disk.
#[derive(Debug, Clone)]
pub struct EntryStore {
    path: PathBuf,
}

impl EntryStore {
    /// Bind to `path`, creating its parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry in write order. A missing file is initialized to `[]`.
    pub fn load(&self) -> Result<Vec<Entry>, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "initializing empty entries file");
            self.write_all(&[])?;
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let entries: Vec<Entry> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(count = entries.len(), "entries loaded");
        Ok(entries)
    }

    /// Append one entry: load, push, rewrite the whole file.
    pub fn append(&self, entry: &Entry) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.push(entry.clone());
        self.write_all(&entries)?;
        tracing::info!(
            timestamp = %entry.timestamp,
            emotion = %entry.emotion,
            total = entries.len(),
            "entry saved"
        );
        Ok(())
    }

    /// Replace the file contents with `entries` (pretty JSON, 2-space indent).
    pub fn write_all(&self, entries: &[Entry]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(ts: &str, text: &str, emotion: &str) -> Entry {
        Entry {
            timestamp: ts.into(),
            entry: text.into(),
            emotion: emotion.into(),
            summary: text.into(),
        }
    }

    #[test]
    fn load_initializes_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("entries.json");
        let store = EntryStore::open(&path).unwrap();

        assert!(store.load().unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn append_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let store = EntryStore::open(tmp.path().join("entries.json")).unwrap();

        store.append(&entry("2024-01-02T09:00:00", "second written first", "sadness")).unwrap();
        store.append(&entry("2024-01-01T10:00:00", "first written second", "joy")).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].entry, "second written first");
        assert_eq!(loaded[1].entry, "first written second");
    }

    #[test]
    fn corrupt_file_is_surfaced_not_discarded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entries.json");
        std::fs::write(&path, "[{\"timestamp\": ").unwrap();
        let store = EntryStore::open(&path).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        // The broken file must still be there, untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{\"timestamp\": ");
    }

    #[test]
    fn append_refuses_to_overwrite_corrupt_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entries.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        let store = EntryStore::open(&path).unwrap();

        assert!(store.append(&entry("2024-01-01T10:00:00", "x", "joy")).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"not\": \"an array\"}");
    }

    #[test]
    fn file_uses_the_four_field_layout() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entries.json");
        let store = EntryStore::open(&path).unwrap();
        store.append(&entry("2024-01-01T10:00:00", "great day", "joy")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let obj = raw[0].as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["emotion", "entry", "summary", "timestamp"]);
    }
}
