//! Storage backends: a string-slot key-value seam.
//!
//! The catalog never talks to the filesystem directly; it reads and writes
//! named slots through this trait so tests can substitute an in-memory
//! backend (including one with a tiny capacity to exercise quota recovery).

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused the write because its byte budget would be
    /// exceeded. Recoverable via the store's trim-and-retry path.
    #[error("Capacity exceeded writing slot {slot}")]
    CapacityExceeded { slot: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub trait StorageBackend: Send + Sync {
    /// Read a slot. `None` when the slot has never been written.
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, replacing any previous value.
    fn set(&mut self, slot: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing an absent slot is not an error.
    fn remove(&mut self, slot: &str) -> Result<(), StorageError>;
}

// --- In-memory backend ---

/// Map-backed storage with an optional byte budget. Used in tests and
/// for ephemeral catalogs that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
    budget_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            budget_bytes: Some(budget_bytes),
        }
    }

    fn used_after(&self, slot: &str, value: &str) -> usize {
        self.slots
            .iter()
            .filter(|(name, _)| name.as_str() != slot)
            .map(|(name, v)| name.len() + v.len())
            .sum::<usize>()
            + slot.len()
            + value.len()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        if let Some(budget) = self.budget_bytes {
            if self.used_after(slot, value) > budget {
                return Err(StorageError::CapacityExceeded {
                    slot: slot.to_string(),
                });
            }
        }
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), StorageError> {
        self.slots.remove(slot);
        Ok(())
    }
}

// --- File backend ---

/// One file per slot under a data directory. Writes go to a temporary
/// file first and are renamed into place, so a crash mid-write leaves the
/// previous slot contents intact.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    budget_bytes: Option<u64>,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>, budget_bytes: Option<u64>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::Backend(format!("creating {}: {e}", dir.display())))?;
        Ok(Self { dir, budget_bytes })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        let name: String = slot
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    fn used_bytes_excluding(&self, excluded: &Path) -> Result<u64, StorageError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| StorageError::Backend(format!("reading {}: {e}", self.dir.display())))?;
        let mut total = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Backend(e.to_string()))?;
            if entry.path() == excluded {
                continue;
            }
            let meta = entry
                .metadata()
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            if meta.is_file() {
                total += meta.len();
            }
        }
        Ok(total)
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Backend(format!("reading slot {slot}: {e}"))),
        }
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(slot);
        if let Some(budget) = self.budget_bytes {
            let used = self.used_bytes_excluding(&path)?;
            if used + value.len() as u64 > budget {
                return Err(StorageError::CapacityExceeded {
                    slot: slot.to_string(),
                });
            }
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .map_err(|e| StorageError::Backend(format!("writing slot {slot}: {e}")))?;
        fs::rename(&tmp, &path)
            .map_err(|e| StorageError::Backend(format!("committing slot {slot}: {e}")))?;
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Backend(format!("removing slot {slot}: {e}"))),
        }
    }
}
