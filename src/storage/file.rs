//! FileStorage - a flat key-value JSON file.
//!
//! The whole map lives in memory and is rewritten to disk on every change
//! (temp file + rename, so readers never see a half-written file). Writes by
//! other processes are picked up with [`FileStorage::reload`], which notifies
//! listeners of exactly the keys whose values changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{ChangeCallback, Storage, StorageError};
use crate::listener::KeyedListeners;
use crate::subscription::Subscription;
use crate::value::Value;

type Entries = BTreeMap<String, Value>;

/// File-backed storage of [`Value`]s.
///
/// Clones share the in-memory map and the listeners.
#[derive(Clone)]
pub struct FileStorage {
    path: PathBuf,
    pretty: bool,
    entries: Arc<RwLock<Entries>>,
    listeners: KeyedListeners<Option<Value>>,
}

impl FileStorage {
    /// Open the file at `path`, creating parent directories as needed. A
    /// missing file is an empty store; it is created on the first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let entries = read_entries(&path)?;
        debug!(path = %path.display(), keys = entries.len(), "opened file storage");

        Ok(Self {
            path,
            pretty: false,
            entries: Arc::new(RwLock::new(entries)),
            listeners: KeyedListeners::new(),
        })
    }

    /// Write indented JSON.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("keys"))?;
        Ok(entries.keys().cloned().collect())
    }

    /// Re-read the file and notify listeners of every key that changed on
    /// disk since the last read or write. Returns the changed keys.
    pub fn reload(&self) -> Result<Vec<String>, StorageError> {
        let fresh = read_entries(&self.path)?;
        let changes: Vec<(String, Option<Value>)> = {
            let mut entries = self
                .entries
                .write()
                .map_err(|_| StorageError::LockPoisoned("reload"))?;

            let mut changes = Vec::new();
            for (key, value) in &fresh {
                if entries.get(key) != Some(value) {
                    changes.push((key.clone(), Some(value.clone())));
                }
            }
            for key in entries.keys() {
                if !fresh.contains_key(key) {
                    changes.push((key.clone(), None));
                }
            }
            *entries = fresh;
            changes
        };

        debug!(path = %self.path.display(), changed = changes.len(), "reloaded file storage");
        let keys = changes.iter().map(|(key, _)| key.clone()).collect();
        for (key, value) in changes {
            self.listeners.notify(&key, value);
        }
        Ok(keys)
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(entries)?
        } else {
            serde_json::to_vec(entries)?
        };

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Insert (`Some`) or remove (`None`) and flush. A failed flush restores
    /// the previous entry. Returns `false` when removing a missing key.
    fn update(
        &self,
        key: &str,
        operation: &'static str,
        value: Option<Value>,
    ) -> Result<bool, StorageError> {
        if let Some(value) = &value {
            ensure_finite(value)?;
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned(operation))?;

        let previous = match &value {
            Some(value) => entries.insert(key.to_string(), value.clone()),
            None => entries.remove(key),
        };
        if value.is_none() && previous.is_none() {
            return Ok(false);
        }

        if let Err(err) = self.write_entries(&entries) {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(err);
        }
        Ok(true)
    }
}

/// JSON has no NaN or infinity; `serde_json` would write them as `null` and
/// the file could no longer be read.
fn ensure_finite(value: &Value) -> Result<(), StorageError> {
    match value {
        Value::Double(d) if !d.is_finite() => Err(StorageError::Serde(format!(
            "non-finite number {} cannot be stored as JSON",
            d
        ))),
        Value::Float(f) if !f.is_finite() => Err(StorageError::Serde(format!(
            "non-finite number {} cannot be stored as JSON",
            f
        ))),
        Value::List(items) => items.iter().try_for_each(ensure_finite),
        Value::Map(entries) => entries.values().try_for_each(ensure_finite),
        _ => Ok(()),
    }
}

fn read_entries(path: &Path) -> Result<Entries, StorageError> {
    if !path.exists() {
        return Ok(Entries::new());
    }
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Ok(Entries::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

impl Storage for FileStorage {
    type Raw = Value;

    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("get"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.update(key, "set", Some(value.clone()))?;
        self.listeners.notify(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.update(key, "remove", None)? {
            self.listeners.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self, key: &str, on_change: ChangeCallback<Value>) -> Subscription {
        self.listeners.subscribe(key, on_change)
    }
}
