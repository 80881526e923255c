//! The catalog store: in-memory collections + guarded persistence.

use std::collections::BTreeMap;

use tracing::{info, warn};

use agora_common::{normalized_key, Academic, AgoraError, NoveltyTile, PendingSubmission};

use crate::backend::{StorageBackend, StorageError};

/// Slot names for the four persisted collections plus the two safety
/// copies of the catalog.
pub mod slots {
    pub const ACADEMICS: &str = "agora:academics";
    pub const ACADEMICS_BACKUP: &str = "agora:academics:backup";
    pub const ACADEMICS_PRECLEAR: &str = "agora:academics:preclear";
    pub const TILES: &str = "agora:tiles";
    pub const FAVORITES: &str = "agora:favorites";
    pub const PENDING: &str = "agora:pending";
}

/// In-memory retention bound for novelty tiles.
const MAX_TILES_RETAINED: usize = 50;
/// How many tiles survive the quota-recovery trim.
const QUOTA_TRIM_TILES: usize = 20;

impl From<StorageError> for AgoraError {
    fn from(err: StorageError) -> Self {
        AgoraError::Storage(err.to_string())
    }
}

pub struct CatalogStore {
    backend: Box<dyn StorageBackend>,
    academics: BTreeMap<String, Academic>,
    tiles: Vec<NoveltyTile>,
    favorites: Vec<String>,
    pending: Vec<PendingSubmission>,
}

impl CatalogStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            academics: BTreeMap::new(),
            tiles: Vec::new(),
            favorites: Vec::new(),
            pending: Vec::new(),
        }
    }

    // --- catalog access ---

    pub fn academics(&self) -> &BTreeMap<String, Academic> {
        &self.academics
    }

    pub fn get(&self, key: &str) -> Option<&Academic> {
        self.academics.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Academic> {
        self.academics.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.academics.contains_key(key)
    }

    /// Insert or replace a record in memory, keyed by its normalized name.
    /// Persistence is a separate, explicit step.
    pub fn put(&mut self, academic: Academic) {
        self.academics.insert(academic.key(), academic);
    }

    pub fn len(&self) -> usize {
        self.academics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.academics.is_empty()
    }

    // --- persistence: catalog ---

    /// Persist the catalog with the backup/verify/restore discipline:
    /// the previous durable value is copied to a backup slot, the new
    /// value is written and read back, and a verification failure rolls
    /// both the durable slot and the in-memory catalog back to the state
    /// before the save attempt.
    pub fn persist_academics(&mut self) -> Result<(), AgoraError> {
        let serialized = serde_json::to_string(&self.academics)
            .map_err(|e| AgoraError::Storage(format!("serializing catalog: {e}")))?;

        if let Some(current) = self.backend.get(slots::ACADEMICS)? {
            self.backend.set(slots::ACADEMICS_BACKUP, &current)?;
        }

        if let Err(err) = self.backend.set(slots::ACADEMICS, &serialized) {
            match err {
                StorageError::CapacityExceeded { .. } => self.recover_capacity(&serialized)?,
                other => return Err(other.into()),
            }
        }

        self.verify_or_restore()
    }

    /// Quota recovery: trim the tile list to its most recent entries,
    /// persist only the trimmed auxiliary list, then retry the primary
    /// write exactly once.
    fn recover_capacity(&mut self, serialized: &str) -> Result<(), AgoraError> {
        warn!(
            kept = QUOTA_TRIM_TILES,
            "storage capacity exceeded, trimming novelty tiles and retrying"
        );
        let keep = self.tiles.len().min(QUOTA_TRIM_TILES);
        self.tiles.drain(..self.tiles.len() - keep);
        self.persist_tiles()?;

        self.backend.set(slots::ACADEMICS, serialized).map_err(|err| {
            warn!(error = %err, "catalog write failed again after tile trim");
            self.resync_from_durable();
            AgoraError::Storage("capacity exceeded after tile-trim recovery".into())
        })
    }

    fn verify_or_restore(&mut self) -> Result<(), AgoraError> {
        let readback = self.backend.get(slots::ACADEMICS)?;
        let valid = readback
            .as_deref()
            .map(|v| serde_json::from_str::<BTreeMap<String, Academic>>(v).is_ok())
            .unwrap_or(false);
        if valid {
            return Ok(());
        }

        warn!("persisted catalog failed verification, restoring backup");
        match self.backend.get(slots::ACADEMICS_BACKUP)? {
            Some(backup) => self.backend.set(slots::ACADEMICS, &backup)?,
            None => self.backend.remove(slots::ACADEMICS)?,
        }
        self.resync_from_durable();
        Err(AgoraError::Storage(
            "catalog write failed verification".into(),
        ))
    }

    /// Reset the in-memory catalog to whatever is durably stored, so a
    /// failed save never leaves memory ahead of disk.
    fn resync_from_durable(&mut self) {
        match self.backend.get(slots::ACADEMICS) {
            Ok(Some(value)) => match serde_json::from_str(&value) {
                Ok(catalog) => self.academics = catalog,
                Err(err) => warn!(error = %err, "durable catalog unparsable during resync"),
            },
            Ok(None) => self.academics.clear(),
            Err(err) => warn!(error = %err, "durable catalog unreadable during resync"),
        }
    }

    // --- persistence: auxiliary collections ---

    fn persist_tiles(&mut self) -> Result<(), AgoraError> {
        let serialized = serde_json::to_string(&self.tiles)
            .map_err(|e| AgoraError::Storage(format!("serializing tiles: {e}")))?;
        Ok(self.backend.set(slots::TILES, &serialized)?)
    }

    fn persist_favorites(&mut self) -> Result<(), AgoraError> {
        let serialized = serde_json::to_string(&self.favorites)
            .map_err(|e| AgoraError::Storage(format!("serializing favorites: {e}")))?;
        Ok(self.backend.set(slots::FAVORITES, &serialized)?)
    }

    fn persist_pending(&mut self) -> Result<(), AgoraError> {
        let serialized = serde_json::to_string(&self.pending)
            .map_err(|e| AgoraError::Storage(format!("serializing pending queue: {e}")))?;
        Ok(self.backend.set(slots::PENDING, &serialized)?)
    }

    /// Persist every collection. Used by the auto-persist task and on
    /// shutdown; mutating operations persist their own collection eagerly.
    pub fn persist_all(&mut self) -> Result<(), AgoraError> {
        self.persist_academics()?;
        self.persist_tiles()?;
        self.persist_favorites()?;
        self.persist_pending()
    }

    // --- load ---

    /// Load all four collections. A collection that fails to parse is
    /// skipped (its in-memory default kept) rather than aborting the
    /// load. Returns true when the catalog loaded at least one record.
    pub fn load(&mut self) -> Result<bool, AgoraError> {
        if let Some(catalog) = self.load_collection(slots::ACADEMICS)? {
            self.academics = catalog;
        }
        if let Some(tiles) = self.load_collection(slots::TILES)? {
            self.tiles = tiles;
        }
        if let Some(favorites) = self.load_collection(slots::FAVORITES)? {
            self.favorites = favorites;
        }
        if let Some(pending) = self.load_collection(slots::PENDING)? {
            self.pending = pending;
        }
        Ok(!self.academics.is_empty())
    }

    fn load_collection<T: serde::de::DeserializeOwned>(
        &mut self,
        slot: &str,
    ) -> Result<Option<T>, AgoraError> {
        let Some(raw) = self.backend.get(slot)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(slot, error = %err, "skipping unparsable persisted collection");
                Ok(None)
            }
        }
    }

    // --- novelty tiles ---

    /// Tiles ordered most recent first for display.
    pub fn tiles(&self) -> Vec<NoveltyTile> {
        let mut tiles = self.tiles.clone();
        tiles.sort_by(|a, b| b.date.cmp(&a.date));
        tiles
    }

    pub fn add_tile(&mut self, tile: NoveltyTile) -> Result<(), AgoraError> {
        self.tiles.push(tile);
        if self.tiles.len() > MAX_TILES_RETAINED {
            let excess = self.tiles.len() - MAX_TILES_RETAINED;
            self.tiles.drain(..excess);
        }
        self.persist_tiles()
    }

    // --- favorites ---

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Add a favorite by name or key. Returns false (without error) when
    /// the record does not exist; adding an existing favorite is a no-op.
    pub fn add_favorite(&mut self, name: &str) -> Result<bool, AgoraError> {
        let key = normalized_key(name);
        if !self.academics.contains_key(&key) {
            return Ok(false);
        }
        if !self.favorites.contains(&key) {
            self.favorites.push(key);
            self.persist_favorites()?;
        }
        Ok(true)
    }

    pub fn remove_favorite(&mut self, name: &str) -> Result<bool, AgoraError> {
        let key = normalized_key(name);
        let before = self.favorites.len();
        self.favorites.retain(|fav| fav != &key);
        if self.favorites.len() == before {
            return Ok(false);
        }
        self.persist_favorites()?;
        Ok(true)
    }

    // --- pending submissions ---

    pub fn pending(&self) -> &[PendingSubmission] {
        &self.pending
    }

    pub fn push_pending(&mut self, submission: PendingSubmission) -> Result<(), AgoraError> {
        self.pending.push(submission);
        self.persist_pending()
    }

    /// Remove a queued submission by position. Returns false when the
    /// position is out of range.
    pub fn remove_pending(&mut self, index: usize) -> Result<bool, AgoraError> {
        if index >= self.pending.len() {
            return Ok(false);
        }
        self.pending.remove(index);
        self.persist_pending()?;
        Ok(true)
    }

    // --- export / import / clear ---

    pub fn export_json(&self) -> Result<String, AgoraError> {
        serde_json::to_string_pretty(&self.academics)
            .map_err(|e| AgoraError::Storage(format!("exporting catalog: {e}")))
    }

    pub fn import_json(&mut self, json: &str) -> Result<usize, AgoraError> {
        let parsed: BTreeMap<String, Academic> = serde_json::from_str(json)
            .map_err(|e| AgoraError::Validation(format!("import is not a catalog: {e}")))?;
        self.replace_catalog(parsed.into_values())?;
        Ok(self.academics.len())
    }

    /// Replace the whole catalog, re-keying every record from its name.
    /// Records without a name are dropped with a warning.
    pub fn replace_catalog(
        &mut self,
        records: impl IntoIterator<Item = Academic>,
    ) -> Result<(), AgoraError> {
        let mut catalog = BTreeMap::new();
        for record in records {
            if record.name.trim().is_empty() {
                warn!("dropping unnamed record from imported catalog");
                continue;
            }
            catalog.insert(record.key(), record);
        }
        self.academics = catalog;
        self.persist_academics()
    }

    /// Full-store clear. The catalog is copied to a pre-clear safety slot
    /// first; all four collections are then removed durably and in memory.
    pub fn clear(&mut self) -> Result<(), AgoraError> {
        if let Some(current) = self.backend.get(slots::ACADEMICS)? {
            self.backend.set(slots::ACADEMICS_PRECLEAR, &current)?;
        }
        for slot in [
            slots::ACADEMICS,
            slots::ACADEMICS_BACKUP,
            slots::TILES,
            slots::FAVORITES,
            slots::PENDING,
        ] {
            self.backend.remove(slot)?;
        }
        self.academics.clear();
        self.tiles.clear();
        self.favorites.clear();
        self.pending.clear();
        info!("catalog cleared");
        Ok(())
    }
}
