// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites persisted to a single key-value slot.

use crate::models::Activity;
use dashmap::DashMap;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Storage slot owned by the favorites store.
pub const FAVORITES_KEY: &str = "activity-jar-favorites";

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),
}

/// Minimal get/set/clear contract for local persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        (**self).clear(key)
    }
}

/// In-memory store. Nothing survives a restart; the server itself always
/// uses `FileStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary file that is renamed over the slot, so a reader
/// sees either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Ordered set of favorite activities, unique by id.
///
/// The persisted slot and the in-memory list match after every call: a
/// mutation is applied only once the write succeeds.
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    favorites: Vec<Activity>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Load from storage. Never fails: a missing, unreadable or corrupt slot
    /// starts an empty set.
    pub fn load(storage: S) -> Self {
        let favorites = match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match decode_favorites(&raw) {
                Ok(favorites) => favorites,
                Err(e) => {
                    tracing::warn!(error = %e, "Favorites slot unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites slot, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = favorites.len(), "Favorites loaded");
        Self { storage, favorites }
    }

    /// Add the activity if absent, remove it if present.
    ///
    /// Returns whether the activity is a favorite afterwards.
    pub fn toggle(&mut self, activity: Activity) -> Result<bool, StorageError> {
        let mut next = self.favorites.clone();
        let now_favorite = match next.iter().position(|a| a.id == activity.id) {
            Some(idx) => {
                next.remove(idx);
                false
            }
            None => {
                next.push(activity);
                true
            }
        };

        self.commit(next)?;
        Ok(now_favorite)
    }

    /// Remove by id. Unknown ids are ignored; the set is persisted either way.
    pub fn remove(&mut self, id: &str) -> Result<(), StorageError> {
        let next: Vec<Activity> = self
            .favorites
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        self.commit(next)
    }

    /// Remove every favorite and drop the slot.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.clear(FAVORITES_KEY)?;
        self.favorites.clear();
        Ok(())
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|a| a.id == id)
    }

    /// Favorites in insertion order.
    pub fn favorites(&self) -> &[Activity] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    fn commit(&mut self, next: Vec<Activity>) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&next)?;
        self.storage.set(FAVORITES_KEY, &encoded)?;
        self.favorites = next;
        Ok(())
    }
}

/// Parse a persisted slot. Duplicate ids keep the first entry and entries
/// breaking activity invariants are dropped.
fn decode_favorites(raw: &str) -> Result<Vec<Activity>, StorageError> {
    let stored: Vec<Activity> =
        serde_json::from_str(raw).map_err(|e| StorageError::Corrupt(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut favorites = Vec::with_capacity(stored.len());
    for activity in stored {
        if let Err(e) = activity.validate() {
            tracing::warn!(id = %activity.id, error = %e, "Dropping invalid stored favorite");
            continue;
        }
        if seen.insert(activity.id.clone()) {
            favorites.push(activity);
        }
    }
    Ok(favorites)
}
