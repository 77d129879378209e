// Cache store for the last-known-good value of each data kind.
// Handles JSON serialization, fetch timestamps, and atomic file writes.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::Result;
use crate::state::DataKind;

/// A persisted value together with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheRecord<T> {
    /// Wrap a freshly fetched value, stamped with the current time.
    pub fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Utc::now(),
        }
    }
}

/// Timestamp-only view of a record, for freshness checks that should not
/// pay for (or depend on) decoding the value.
#[derive(Debug, Deserialize)]
struct RecordStamp {
    fetched_at: DateTime<Utc>,
}

/// Durable per-kind key/value store, one JSON file per data kind.
///
/// The coordinator's post-barrier path is the only writer for a given
/// kind; the in-flight guard upholds that.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Open the store in the platform cache directory.
    pub fn open_default() -> Option<Self> {
        super::paths::cache_dir().map(Self::at)
    }

    /// Open the store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, kind: DataKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Load the record for a kind, or None if nothing was ever saved.
    pub fn load<T: DeserializeOwned>(&self, kind: DataKind) -> Result<Option<CacheRecord<T>>> {
        let path = self.record_path(kind);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let record: CacheRecord<T> = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    /// Save a value for a kind, stamped with the current time.
    /// Returns the timestamp written.
    pub fn save<T: Serialize>(&self, kind: DataKind, value: &T) -> Result<DateTime<Utc>> {
        let path = self.record_path(kind);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let record = CacheRecord::new(value);
        let json = serde_json::to_string_pretty(&record)?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        debug!(kind = kind.file_name(), "cache record written");
        Ok(record.fetched_at)
    }

    /// When the kind was last fetched, if ever. Unreadable or corrupt
    /// records count as never fetched.
    pub fn fetched_at(&self, kind: DataKind) -> Option<DateTime<Utc>> {
        let path = self.record_path(kind);
        let contents = fs::read_to_string(path).ok()?;
        let stamp: RecordStamp = serde_json::from_str(&contents).ok()?;
        Some(stamp.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::at(temp_dir.path());

        let data = vec![
            TestData {
                name: "one".to_string(),
                value: 1,
            },
            TestData {
                name: "two".to_string(),
                value: 2,
            },
        ];

        let written_at = store.save(DataKind::Repositories, &data).unwrap();

        let record: CacheRecord<Vec<TestData>> =
            store.load(DataKind::Repositories).unwrap().unwrap();
        assert_eq!(record.value, data);
        assert_eq!(record.fetched_at, written_at);
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::at(temp_dir.path());

        let record: Option<CacheRecord<Vec<TestData>>> =
            store.load(DataKind::Contributions).unwrap();
        assert!(record.is_none());
        assert!(store.fetched_at(DataKind::Contributions).is_none());
    }

    #[test]
    fn kinds_are_stored_independently() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::at(temp_dir.path());

        store.save(DataKind::Repositories, &vec![1, 2, 3]).unwrap();

        let repos: Option<CacheRecord<Vec<i32>>> = store.load(DataKind::Repositories).unwrap();
        let contribs: Option<CacheRecord<Vec<i32>>> = store.load(DataKind::Contributions).unwrap();
        assert!(repos.is_some());
        assert!(contribs.is_none());
    }

    #[test]
    fn fetched_at_reads_timestamp_without_value_type() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::at(temp_dir.path());

        let written_at = store
            .save(
                DataKind::Repositories,
                &TestData {
                    name: "x".to_string(),
                    value: 9,
                },
            )
            .unwrap();

        assert_eq!(store.fetched_at(DataKind::Repositories), Some(written_at));
    }

    #[test]
    fn timestamps_are_monotonic_across_saves() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::at(temp_dir.path());

        let first = store.save(DataKind::Repositories, &1).unwrap();
        let second = store.save(DataKind::Repositories, &2).unwrap();
        assert!(second >= first);
    }

    #[test]
    fn corrupt_record_counts_as_never_fetched() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::at(temp_dir.path());

        let path = temp_dir.path().join(DataKind::Repositories.file_name());
        fs::write(&path, "not json").unwrap();

        assert!(store.fetched_at(DataKind::Repositories).is_none());
        let record: Result<Option<CacheRecord<i32>>> = store.load(DataKind::Repositories);
        assert!(record.is_err());
    }
}
