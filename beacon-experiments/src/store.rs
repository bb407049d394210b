//! Assignment storage
//!
//! A store maps `ab_test_{experiment}` keys to variant names. Stores are
//! shared and take no lock across a read-then-write, so two first-time
//! callers may both draw; the last write wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::StoreError;

/// Persistent key/value space for assignments.
pub trait AssignmentStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssignmentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: a JSON object of key to variant name.
///
/// The file is read once on open and rewritten on every set.
#[derive(Debug)]
pub struct FileStore {
    entries: RwLock<BTreeMap<String, String>>,
    file_path: PathBuf,
}

impl FileStore {
    /// Load assignments from `file_path`, or start empty if it does not exist.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let file_path = file_path.into();

        let entries = if file_path.exists() {
            let content = fs::read_to_string(&file_path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %file_path.display(), count = entries.len(), "Loaded assignments");

        Ok(Self {
            entries: RwLock::new(entries),
            file_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Storage(format!(
                    "failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.file_path, content).map_err(|e| {
            StoreError::Storage(format!(
                "failed to write {}: {}",
                self.file_path.display(),
                e
            ))
        })
    }
}

impl AssignmentStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }
}
