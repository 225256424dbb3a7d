use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use parking_lot::RwLock;
use tracing::debug;

use super::CounterStore;
use crate::error::StoreError;

type Counts = BTreeMap<String, BTreeMap<String, u64>>;

/// Counter store persisted as `{ "<application>": { "<file>": count } }`.
///
/// Every increment is written through to disk while the write lock is held,
/// so concurrent grabs never lose updates within one process.
#[derive(Debug)]
pub struct JsonCounterStore {
    path: PathBuf,
    counts: RwLock<Counts>,
}

impl JsonCounterStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let counts = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|err| StoreError::io(&path, err))?;
            serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?
        } else {
            debug!("counter file {} missing, starting empty", path.display());
            Counts::new()
        };

        Ok(Self {
            path,
            counts: RwLock::new(counts),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, counts: &Counts) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let serialised =
            serde_json::to_vec_pretty(counts).map_err(|source| StoreError::Serialization {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, serialised).map_err(|err| StoreError::io(&self.path, err))
    }
}

impl CounterStore for JsonCounterStore {
    fn get(&self, application: &str, file_name: &str) -> Result<u64, StoreError> {
        Ok(self
            .counts
            .read()
            .get(application)
            .and_then(|files| files.get(file_name))
            .copied()
            .unwrap_or(0))
    }

    fn increment(&self, application: &str, file_name: &str) -> Result<u64, StoreError> {
        let mut counts = self.counts.write();
        let count = counts
            .entry(application.to_string())
            .or_default()
            .entry(file_name.to_string())
            .or_insert(0);
        *count += 1;
        let updated = *count;
        self.persist(&counts)?;
        Ok(updated)
    }
}

/// Non-persistent counter store.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counts: RwLock<HashMap<(String, String), u64>>,
}

impl MemoryCounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the count for one file.
    pub fn set(&self, application: &str, file_name: &str, count: u64) {
        self.counts
            .write()
            .insert((application.to_string(), file_name.to_string()), count);
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, application: &str, file_name: &str) -> Result<u64, StoreError> {
        Ok(self
            .counts
            .read()
            .get(&(application.to_string(), file_name.to_string()))
            .copied()
            .unwrap_or(0))
    }

    fn increment(&self, application: &str, file_name: &str) -> Result<u64, StoreError> {
        let mut counts = self.counts.write();
        let count = counts
            .entry((application.to_string(), file_name.to_string()))
            .or_insert(0);
        *count += 1;
        Ok(*count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn json_store_persists_increments() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state").join("counters.json");

        let store = JsonCounterStore::open(&path)?;
        assert_eq!(store.get("Paper", "a.jar")?, 0);
        assert_eq!(store.increment("Paper", "a.jar")?, 1);
        assert_eq!(store.increment("Paper", "a.jar")?, 2);
        assert_eq!(store.increment("Spigot", "a.jar")?, 1);
        assert!(path.exists());

        let reopened = JsonCounterStore::open(&path)?;
        assert_eq!(reopened.get("Paper", "a.jar")?, 2);
        assert_eq!(reopened.get("Spigot", "a.jar")?, 1);
        assert_eq!(reopened.get("Spigot", "b.jar")?, 0);
        Ok(())
    }

    #[test]
    fn json_store_rejects_corrupt_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("counters.json");
        fs::write(&path, "not json")?;
        assert!(matches!(
            JsonCounterStore::open(&path),
            Err(StoreError::Serialization { .. })
        ));
        Ok(())
    }

    #[test]
    fn memory_store_counts() -> anyhow::Result<()> {
        let store = MemoryCounterStore::new();
        store.set("Paper", "a.jar", 41);
        assert_eq!(store.increment("Paper", "a.jar")?, 42);
        assert_eq!(store.get("Paper", "b.jar")?, 0);
        Ok(())
    }
}
