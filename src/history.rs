//! Persisted log of finished matches, newest first.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::StorageError, storage::Storage};

pub const HISTORY_KEY: &str = "noughts-and-crosses-history";

const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub result: String,
}

impl HistoryEntry {
    pub fn new(timestamp: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            result: result.into(),
        }
    }

    /// Stamps `result` with the local date and time, e.g. `Oct 18, 2026, 07:55 PM`.
    pub fn now(result: impl Into<String>) -> Self {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::new(timestamp, result)
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore<S: Storage> {
    storage: S,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Reads the log. Anything missing, unreadable or malformed is an empty log.
    pub fn load(&self) -> Vec<HistoryEntry> {
        self.read().unwrap_or_else(|e| {
            warn!("could not read match history: {e}");
            Vec::new()
        })
    }

    /// Like [`HistoryStore::load`], but a backend failure is an error rather
    /// than an empty log. A malformed payload still reads as empty.
    fn read(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let Some(raw) = self.storage.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };

        Ok(ron::from_str(&raw).unwrap_or_else(|e| {
            warn!("discarding malformed match history: {e}");
            Vec::new()
        }))
    }

    /// Prepends `entry` and persists the whole log. Nothing is written if the
    /// current log could not be read, so saved entries are never lost.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut history = self.read()?;
        history.insert(0, entry);

        let raw = ron::to_string(&history).map_err(|source| StorageError::Serialize {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
        self.storage.set(HISTORY_KEY, &raw)?;
        debug!(entries = history.len(), "match history saved");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(HISTORY_KEY)?;
        debug!("match history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BrokenStorage, MemoryStorage};
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    #[test]
    fn empty_when_nothing_stored() {
        let store = HistoryStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn record_then_load_returns_newest_first() {
        let mut store = HistoryStore::new(MemoryStorage::new());
        store.record(HistoryEntry::new("10:00 AM", "Game 1")).unwrap();
        store.record(HistoryEntry::new("10:05 AM", "Game 2")).unwrap();
        store.record(HistoryEntry::new("10:10 AM", "Game 3")).unwrap();

        let results: Vec<_> = store.load().into_iter().map(|e| e.result).collect();
        assert_eq!(results, ["Game 3", "Game 2", "Game 1"]);
    }

    #[test]
    fn record_persists_under_the_history_key() {
        let storage = MemoryStorage::new();
        let mut store = HistoryStore::new(storage.clone());
        store.record(HistoryEntry::new("10:00 AM", "X wins!")).unwrap();

        let raw = storage.get(HISTORY_KEY).unwrap().unwrap();
        assert!(raw.contains("X wins!"));
    }

    #[test]
    fn loads_a_previously_saved_log() {
        let mut storage = MemoryStorage::new();
        let saved = vec![HistoryEntry::new("10:00 AM", "Archived Win")];
        storage
            .set(HISTORY_KEY, &ron::to_string(&saved).unwrap())
            .unwrap();

        assert_eq!(HistoryStore::new(storage).load(), saved);
    }

    #[test]
    fn clear_removes_everything() {
        let storage = MemoryStorage::new();
        let mut store = HistoryStore::new(storage.clone());
        store.record(HistoryEntry::new("10:00 AM", "Deletable Result")).unwrap();
        store.clear().unwrap();

        assert!(store.load().is_empty());
        assert_eq!(storage.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn malformed_payload_loads_as_empty_and_is_replaced() {
        let mut storage = MemoryStorage::new();
        storage.set(HISTORY_KEY, "{not a history").unwrap();
        let mut store = HistoryStore::new(storage);

        assert!(store.load().is_empty());
        store.record(HistoryEntry::new("now", "O wins!")).unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn broken_backend_degrades_without_panicking() {
        let mut store = HistoryStore::new(BrokenStorage);
        assert!(store.load().is_empty());
        assert!(store.record(HistoryEntry::new("now", "X wins!")).is_err());
        assert!(store.clear().is_err());
    }

    /// Memory storage whose reads can be made to fail.
    #[derive(Debug, Clone, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_reads: Arc<AtomicBool>,
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("read failed".to_string()));
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_read_does_not_overwrite_saved_history() {
        let storage = FlakyStorage::default();
        let mut store = HistoryStore::new(storage.clone());
        store.record(HistoryEntry::new("10:00 AM", "Game 1")).unwrap();
        store.record(HistoryEntry::new("10:05 AM", "Game 2")).unwrap();

        storage.fail_reads.store(true, Ordering::SeqCst);
        assert!(store.load().is_empty());
        assert!(store.record(HistoryEntry::new("10:10 AM", "Game 3")).is_err());

        storage.fail_reads.store(false, Ordering::SeqCst);
        let results: Vec<_> = store.load().into_iter().map(|e| e.result).collect();
        assert_eq!(results, ["Game 2", "Game 1"]);
    }

    #[test]
    fn now_stamps_a_readable_timestamp() {
        let entry = HistoryEntry::now("It's a Draw!");
        assert_eq!(entry.result, "It's a Draw!");
        assert!(entry.timestamp.ends_with("AM") || entry.timestamp.ends_with("PM"));
    }
}
