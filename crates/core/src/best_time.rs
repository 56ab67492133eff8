//! Best-time cache - minimum solve time per (game type, difficulty)
//!
//! The cache sits in front of a [`BestTimeStore`]. It enforces the only write rule
//! (accept when there is no record or the new time is strictly smaller) and turns
//! every store failure into "no best time" plus a warning, so a broken or missing
//! store can never interrupt play.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::types::GameType;

/// Record key. One best time per game type and grid dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BestTimeKey {
    pub game_type: GameType,
    pub difficulty: u8,
}

impl BestTimeKey {
    pub fn new(game_type: GameType, difficulty: u8) -> Self {
        Self {
            game_type,
            difficulty,
        }
    }

    /// Key used by durable stores, e.g. `bestTime_slide_4`.
    pub fn storage_key(&self) -> String {
        format!("bestTime_{}_{}", self.game_type.as_str(), self.difficulty)
    }

    /// Inverse of [`BestTimeKey::storage_key`].
    pub fn parse_storage_key(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("bestTime_")?;
        let (game_type, difficulty) = rest.split_once('_')?;
        Some(Self {
            game_type: GameType::from_str(game_type)?,
            difficulty: difficulty.parse().ok()?,
        })
    }
}

/// Durable key -> seconds storage.
///
/// Implementations only store and fetch; the "only if faster" rule lives in
/// [`BestTimeCache`].
pub trait BestTimeStore {
    fn load(&self, key: &BestTimeKey) -> Result<Option<u32>, StoreError>;
    fn save(&mut self, key: &BestTimeKey, seconds: u32) -> Result<(), StoreError>;
}

/// In-process store, used for tests and when no durable location is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryBestTimes {
    records: HashMap<BestTimeKey, u32>,
}

impl MemoryBestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BestTimeStore for MemoryBestTimes {
    fn load(&self, key: &BestTimeKey) -> Result<Option<u32>, StoreError> {
        Ok(self.records.get(key).copied())
    }

    fn save(&mut self, key: &BestTimeKey, seconds: u32) -> Result<(), StoreError> {
        self.records.insert(*key, seconds);
        Ok(())
    }
}

/// Read / conditional-write front for an optional store.
pub struct BestTimeCache {
    store: Option<Box<dyn BestTimeStore + Send>>,
}

impl BestTimeCache {
    pub fn new(store: impl BestTimeStore + Send + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBestTimes::new())
    }

    /// A cache with no backing store: reads are always absent, writes are dropped.
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Best recorded time, or `None` when absent or unreadable
    pub fn read(&self, game_type: GameType, difficulty: u8) -> Option<u32> {
        let store = self.store.as_ref()?;
        let key = BestTimeKey::new(game_type, difficulty);
        match store.load(&key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key = %key.storage_key(), "Failed to read best time");
                None
            }
        }
    }

    /// Record `seconds` if it beats the stored best.
    ///
    /// Returns true only when the store accepted a new record.
    pub fn write(&mut self, game_type: GameType, difficulty: u8, seconds: u32) -> bool {
        let current = self.read(game_type, difficulty);
        if let Some(best) = current {
            if seconds >= best {
                debug!(seconds, best, "Best time not improved");
                return false;
            }
        }

        let Some(store) = self.store.as_mut() else {
            return false;
        };
        let key = BestTimeKey::new(game_type, difficulty);
        match store.save(&key, seconds) {
            Ok(()) => {
                debug!(seconds, previous = ?current, key = %key.storage_key(), "New best time");
                true
            }
            Err(e) => {
                warn!(error = %e, key = %key.storage_key(), "Failed to write best time");
                false
            }
        }
    }
}

impl Default for BestTimeCache {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for BestTimeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestTimeCache")
            .field("available", &self.is_available())
            .finish()
    }
}
