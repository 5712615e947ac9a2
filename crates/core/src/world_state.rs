//! World state backends.
//!
//! The ledger exposes a flat key-value world state with single-key get/put. This module
//! defines that capability as the [`WorldState`] trait and provides two backends:
//!
//! - [`MemoryWorldState`]: an in-memory map, used by tests and when embedding the core
//! - [`FileWorldState`]: a single JSON file mapping keys to base64 values, used by the CLI
//!
//! Backends store raw bytes; they know nothing about documents or key layouts.

use base64::{engine::general_purpose, Engine as _};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read from world state: {0}")]
    Read(String),
    #[error("failed to put to world state: {0}")]
    Write(String),
    #[error("world state I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("world state file is corrupt: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Key-value capability supplied by the hosting ledger.
pub trait WorldState {
    /// Returns the bytes stored at `key`, or `None` if nothing is stored there.
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Applies a whole write set. Backends that can persist atomically should override this.
    fn put_batch(&mut self, writes: Vec<(String, Vec<u8>)>) -> StoreResult<()> {
        for (key, value) in writes {
            self.put_state(&key, value)?;
        }
        Ok(())
    }
}

/// In-memory world state.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorldState {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryWorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl WorldState for MemoryWorldState {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// World state persisted to a single JSON file.
///
/// The whole map is loaded on open and rewritten on every write batch. Rewrites go to a
/// sibling temporary file which is then renamed over the existing one.
#[derive(Debug)]
pub struct FileWorldState {
    path: PathBuf,
    entries: BTreeMap<String, Vec<u8>>,
}

impl FileWorldState {
    /// Opens the world state at `path`. A missing file is an empty world state.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!("world state file {} not found; starting empty", path.display());
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let raw = fs::read_to_string(&path)?;
        let encoded: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (key, value) in encoded {
            let bytes = general_purpose::STANDARD
                .decode(value)
                .map_err(|e| StoreError::Corrupt(format!("key {key}: {e}")))?;
            entries.insert(key, bytes);
        }

        Ok(Self { path, entries })
    }

    fn persist(&self) -> StoreResult<()> {
        let encoded: BTreeMap<&str, String> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), general_purpose::STANDARD.encode(v)))
            .collect();
        let json = serde_json::to_string_pretty(&encoded)
            .map_err(|e| StoreError::Write(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl WorldState for FileWorldState {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.put_batch(vec![(key.to_string(), value)])
    }

    fn put_batch(&mut self, writes: Vec<(String, Vec<u8>)>) -> StoreResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let previous = self.entries.clone();
        for (key, value) in writes {
            self.entries.insert(key, value);
        }

        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_world_state_absent_key_is_none() {
        let world = MemoryWorldState::new();
        assert_eq!(world.get_state("patient1").unwrap(), None);
        assert!(world.is_empty());
    }

    #[test]
    fn test_memory_world_state_put_overwrites() {
        let mut world = MemoryWorldState::new();
        world.put_state("k", b"one".to_vec()).unwrap();
        world.put_state("k", b"two".to_vec()).unwrap();

        assert_eq!(world.get_state("k").unwrap(), Some(b"two".to_vec()));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_file_world_state_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let world = FileWorldState::open(temp_dir.path().join("ledger.json"))
            .expect("open should succeed");

        assert_eq!(world.get_state("anything").unwrap(), None);
    }

    #[test]
    fn test_file_world_state_persists_across_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("ledger.json");

        let mut world = FileWorldState::open(&path).expect("open should succeed");
        world
            .put_batch(vec![
                ("patient1".to_string(), b"{\"id\":\"patient1\"}".to_vec()),
                ("payment1".to_string(), vec![0, 159, 146, 150]),
            ])
            .expect("put_batch should succeed");

        assert!(path.is_file(), "ledger file should be written");

        let reopened = FileWorldState::open(&path).expect("reopen should succeed");
        assert_eq!(
            reopened.get_state("patient1").unwrap(),
            Some(b"{\"id\":\"patient1\"}".to_vec())
        );
        assert_eq!(
            reopened.get_state("payment1").unwrap(),
            Some(vec![0, 159, 146, 150])
        );
    }

    #[test]
    fn test_file_world_state_keeps_previous_entries_when_persist_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("ledger.json");

        let mut world = FileWorldState::open(&path).expect("open should succeed");
        world
            .put_state("patient1", b"first".to_vec())
            .expect("first write should succeed");

        // A directory where the temporary file goes makes the next rewrite fail.
        fs::create_dir(temp_dir.path().join("ledger.json.tmp")).expect("should create dir");

        let err = world
            .put_state("patient1", b"second".to_vec())
            .expect_err("persist should fail");
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(world.get_state("patient1").unwrap(), Some(b"first".to_vec()));

        let reopened = FileWorldState::open(&path).expect("reopen should succeed");
        assert_eq!(
            reopened.get_state("patient1").unwrap(),
            Some(b"first".to_vec())
        );
    }

    #[test]
    fn test_file_world_state_rejects_corrupt_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("ledger.json");
        fs::write(&path, "not json at all").expect("should write file");

        let err = FileWorldState::open(&path).expect_err("open should fail");
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_file_world_state_rejects_invalid_base64_value() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("ledger.json");
        fs::write(&path, r#"{"patient1": "!!not base64!!"}"#).expect("should write file");

        let err = FileWorldState::open(&path).expect_err("open should fail");
        assert!(matches!(err, StoreError::Corrupt(msg) if msg.contains("patient1")));
    }
}
