//! Persisted store adapter.
//!
//! Domain stores keep their state in memory and mirror every mutation here
//! as a whole-snapshot write under a fixed key. No diffs, no batching, no
//! cross-store transactions: N mutations produce N writes.
//!
//! Snapshots are wrapped in a `{"v": <version>, "data": <snapshot>}`
//! envelope. Blobs written before the envelope existed load as version 0
//! and run through each record type's migration chain.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::errors::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Contract for a snapshot type persisted under a fixed key.
pub trait Record: Serialize + DeserializeOwned {
    const KEY: &'static str;
    const VERSION: u32;

    /// Upgrade a snapshot written at version `from` by one step.
    fn migrate(from: u32, data: Value) -> Result<Value> {
        let _ = from;
        Ok(data)
    }
}

/// Host key-value primitive: a string-keyed map of raw JSON text with
/// synchronous get/set semantics.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Single-file JSON map. The file is re-read on every access and rewritten
/// on every set; the adapter itself caches nothing.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<HashMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            key: self.path.display().to_string(),
            source,
        })
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string(map).map_err(|source| StorageError::Parse {
            key: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValue for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().expect("file store lock");
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().expect("file store lock");
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().expect("file store lock");
        let mut map = self.read_map()?;
        map.remove(key);
        self.write_map(&map)
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.lock().expect("memory store lock").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .lock()
            .expect("memory store lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.map.lock().expect("memory store lock").remove(key);
        Ok(())
    }
}

/// Typed facade over a [`KeyValue`] backend.
#[derive(Clone)]
pub struct StoreAdapter {
    kv: Arc<dyn KeyValue>,
}

impl StoreAdapter {
    pub fn new(kv: Arc<dyn KeyValue>) -> Self {
        StoreAdapter { kv }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::open(path)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Load the snapshot for `R`, migrating older versions forward.
    /// An unset key is `Ok(None)`.
    pub fn load<R: Record>(&self) -> Result<Option<R>> {
        let raw = match self.kv.get(R::KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let value: Value = serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            key: R::KEY.to_string(),
            source,
        })?;

        let (version, mut data) = split_envelope(value);
        if version > R::VERSION {
            return Err(StorageError::UnsupportedVersion {
                key: R::KEY.to_string(),
                found: version,
                supported: R::VERSION,
            });
        }
        let mut at = version;
        while at < R::VERSION {
            data = R::migrate(at, data)?;
            at += 1;
        }

        let record = serde_json::from_value(data).map_err(|source| StorageError::Parse {
            key: R::KEY.to_string(),
            source,
        })?;
        Ok(Some(record))
    }

    /// Serialize `record` and overwrite whatever was stored before.
    pub fn save<R: Record>(&self, record: &R) -> Result<()> {
        let data = serde_json::to_value(record).map_err(|source| StorageError::Parse {
            key: R::KEY.to_string(),
            source,
        })?;
        let envelope = serde_json::json!({ "v": R::VERSION, "data": data });
        self.kv.set(R::KEY, &envelope.to_string())?;
        tracing::debug!(key = R::KEY, "snapshot persisted");
        Ok(())
    }

    pub fn clear<R: Record>(&self) -> Result<()> {
        self.kv.delete(R::KEY)
    }
}

fn split_envelope(value: Value) -> (u32, Value) {
    if let Value::Object(ref map) = value {
        if let (Some(v), Some(data)) = (map.get("v"), map.get("data")) {
            if let Some(version) = v.as_u64() {
                return (version as u32, data.clone());
            }
        }
    }
    // Legacy blob written before versioning existed.
    (0, value)
}
