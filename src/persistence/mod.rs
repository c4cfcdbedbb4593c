//! Progress persistence
//!
//! Save data is a single JSON document under [`SAVE_KEY`](crate::consts::SAVE_KEY).
//! Missing fields take their defaults and corrupt documents are replaced by
//! defaults, so loading never fails.

pub mod storage;

use serde::{Deserialize, Serialize};

pub use storage::{MemoryStorage, StorageBackend, default_backend};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use crate::consts::SAVE_KEY;

/// Persisted progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    /// Currency earned by distance
    pub feathers: u64,
    pub high_score: u32,
    pub unlocked_skins: Vec<String>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            feathers: 0,
            high_score: 0,
            unlocked_skins: vec!["default".to_string()],
        }
    }
}

impl SaveData {
    /// Parse a stored document, merging onto defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("Save data corrupt, using defaults: {err}");
                Self::default()
            }
        }
    }
}

/// Collaborator that receives run results
pub trait ProgressStore {
    /// Credit a distance-derived reward
    fn add_progress(&mut self, amount: u64);

    /// Offer a final score; returns true if it is a new best
    fn record_score(&mut self, score: u32) -> bool;
}

/// Loads, updates and writes back [`SaveData`]
#[derive(Debug)]
pub struct SaveManager<S: StorageBackend> {
    storage: S,
    data: SaveData,
}

impl<S: StorageBackend> SaveManager<S> {
    pub fn load(storage: S) -> Self {
        let data = match storage.get_item(SAVE_KEY) {
            Some(json) => {
                let data = SaveData::from_json(&json);
                log::info!("Loaded save: {} feathers, best {}", data.feathers, data.high_score);
                data
            }
            None => {
                log::info!("No save found, starting fresh");
                SaveData::default()
            }
        };
        Self { storage, data }
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save(&mut self) {
        match serde_json::to_string(&self.data) {
            Ok(json) => {
                if !self.storage.set_item(SAVE_KEY, &json) {
                    log::warn!("Save write rejected by storage");
                }
            }
            Err(err) => log::warn!("Failed to serialize save: {err}"),
        }
    }
}

impl<S: StorageBackend> ProgressStore for SaveManager<S> {
    fn add_progress(&mut self, amount: u64) {
        self.data.feathers = self.data.feathers.saturating_add(amount);
        self.save();
    }

    fn record_score(&mut self, score: u32) -> bool {
        if score <= self.data.high_score {
            return false;
        }
        log::info!("New best score {score}");
        self.data.high_score = score;
        self.save();
        true
    }
}
