//! Persisted key-value slots.
//!
//! Values are stored as strings, JSON-encoded where they are not scalar,
//! in a single `state.json` object in the data directory.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

pub const STATE_FILE: &str = "state.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode slot `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A flat string-to-string store shared by the auth facade and the preference stores.
pub trait SlotStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Apply several writes as one: `Some` sets a slot, `None` removes it.
    /// On failure the slots already written are put back as they were.
    fn apply(&self, writes: &[(&str, Option<String>)]) -> Result<(), StoreError> {
        let mut previous = Vec::with_capacity(writes.len());
        for (key, value) in writes {
            let before = self.get(key);
            let result = match value {
                Some(value) => self.set(key, value),
                None => self.remove(key),
            };
            if let Err(err) = result {
                rollback(self, &previous);
                return Err(err);
            }
            previous.push((*key, before));
        }
        Ok(())
    }
}

fn rollback<S: SlotStore + ?Sized>(store: &S, previous: &[(&str, Option<String>)]) {
    for (key, before) in previous.iter().rev() {
        let result = match before {
            Some(value) => store.set(key, value),
            None => store.remove(key),
        };
        if let Err(err) = result {
            warn!(key, error = %err, "failed to restore slot after a failed write");
        }
    }
}

fn stage(slots: &mut BTreeMap<String, String>, writes: &[(&str, Option<String>)]) {
    for (key, value) in writes {
        match value {
            Some(value) => slots.insert(key.to_string(), value.clone()),
            None => slots.remove(*key),
        };
    }
}

/// Read a JSON-encoded slot. A value that fails to decode is removed and
/// treated as absent.
pub fn get_json<T: DeserializeOwned>(store: &dyn SlotStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable slot");
            if let Err(err) = store.remove(key) {
                warn!(key, error = %err, "failed to remove unreadable slot");
            }
            None
        }
    }
}

pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn SlotStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Slots kept in memory only.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.slots.lock().remove(key);
        Ok(())
    }

    fn apply(&self, writes: &[(&str, Option<String>)]) -> Result<(), StoreError> {
        stage(&mut self.slots.lock(), writes);
        Ok(())
    }
}

/// Slots mirrored to a JSON file on every write.
pub struct FileStore {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store in `dir`, creating the directory if needed. A missing
    /// or corrupt state file starts empty.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(STATE_FILE);
        let slots = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "state file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, slots: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(slots).map_err(|source| StoreError::Encode {
            key: STATE_FILE.to_string(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SlotStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.lock();
        slots.insert(key.to_string(), value.to_string());
        self.flush(&slots)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.lock();
        if slots.remove(key).is_some() {
            self.flush(&slots)?;
        }
        Ok(())
    }

    /// Written to disk in a single flush. Memory only changes once the flush succeeds.
    fn apply(&self, writes: &[(&str, Option<String>)]) -> Result<(), StoreError> {
        let mut slots = self.slots.lock();
        let mut staged = slots.clone();
        stage(&mut staged, writes);
        self.flush(&staged)?;
        *slots = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("theme", "\"dark\"").unwrap();
            store.set("gone", "1").unwrap();
            store.remove("gone").unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("\"dark\""));
        assert_eq!(store.get("gone"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STATE_FILE), "not json").unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("theme"), None);
        store.set("theme", "\"light\"").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("\"light\""));
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join(STATE_FILE).exists());
    }

    #[test]
    fn json_helpers_round_trip_and_drop_garbage() {
        let store = MemoryStore::new();
        set_json(&store, "open", &true).unwrap();
        assert_eq!(get_json::<bool>(&store, "open"), Some(true));

        store.set("open", "{broken").unwrap();
        assert_eq!(get_json::<bool>(&store, "open"), None);
        assert_eq!(store.get("open"), None);
    }

    /// Fails every write to one key.
    struct RejectingStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl SlotStore for RejectingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.rejected {
                return Err(StoreError::Io {
                    path: PathBuf::from(STATE_FILE),
                    source: io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn apply_puts_back_earlier_writes_on_failure() {
        let store = RejectingStore {
            inner: MemoryStore::new(),
            rejected: "c",
        };
        store.set("a", "old").unwrap();

        let err = store.apply(&[
            ("a", Some("new".to_string())),
            ("b", Some("new".to_string())),
            ("c", Some("new".to_string())),
        ]);

        assert!(err.is_err());
        assert_eq!(store.get("a").as_deref(), Some("old"));
        assert_eq!(store.get("b"), None);
        assert_eq!(store.get("c"), None);
    }

    #[test]
    fn file_store_apply_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("gone", "1").unwrap();

        store
            .apply(&[("kept", Some("2".to_string())), ("gone", None)])
            .unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("kept").as_deref(), Some("2"));
        assert_eq!(reopened.get("gone"), None);
    }

    #[test]
    fn file_store_apply_leaves_memory_alone_when_flush_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "v").unwrap();

        let path = dir.path().join(STATE_FILE);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.apply(&[("k", Some("w".to_string()))]).is_err());
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
