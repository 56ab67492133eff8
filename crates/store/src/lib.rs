//! Durable best-time storage
//!
//! [`JsonFileStore`] keeps every record in one small JSON object keyed by
//! `bestTime_<gameType>_<difficulty>`:
//!
//! ```json
//! {"bestTime_slide_3": 41, "bestTime_jigsaw_4": 97}
//! ```
//!
//! The file is read once when the store opens and rewritten on every save.
//! [`StoreConfig`] picks a store from the environment and always yields a usable
//! [`BestTimeCache`]; a store that cannot be opened degrades to "no best time".
//!
//! # Environment Variables
//!
//! - `PUZZLE_BEST_TIMES_PATH`: JSON file location (in-memory records when unset)
//! - `PUZZLE_BEST_TIMES_DISABLED`: Set to "1" or "true" to disable best times

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use picture_puzzle_core::best_time::{BestTimeCache, BestTimeKey, BestTimeStore};
use picture_puzzle_core::error::StoreError;

pub use picture_puzzle_core as core;
pub use picture_puzzle_types as types;

/// Best times persisted as a JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<String, u32>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. Unparseable contents are an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        debug!(path = %path.display(), records = records.len(), "Opened best-time store");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.records)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl BestTimeStore for JsonFileStore {
    fn load(&self, key: &BestTimeKey) -> Result<Option<u32>, StoreError> {
        Ok(self.records.get(&key.storage_key()).copied())
    }

    fn save(&mut self, key: &BestTimeKey, seconds: u32) -> Result<(), StoreError> {
        let storage_key = key.storage_key();
        let previous = self.records.insert(storage_key.clone(), seconds);
        if let Err(e) = self.flush() {
            // Keep memory and disk in agreement.
            match previous {
                Some(v) => self.records.insert(storage_key, v),
                None => self.records.remove(&storage_key),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// Where best times live
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
    pub disabled: bool,
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let path = env::var("PUZZLE_BEST_TIMES_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        let disabled = env::var("PUZZLE_BEST_TIMES_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self { path, disabled }
    }

    /// Build the cache this configuration describes.
    pub fn open_cache(&self) -> BestTimeCache {
        if self.disabled {
            info!("Best times disabled");
            return BestTimeCache::unavailable();
        }
        let Some(path) = self.path.as_ref() else {
            return BestTimeCache::in_memory();
        };
        match JsonFileStore::open(path) {
            Ok(store) => {
                info!(path = %path.display(), "Best times stored on disk");
                BestTimeCache::new(store)
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Best-time store unavailable");
                BestTimeCache::unavailable()
            }
        }
    }
}
