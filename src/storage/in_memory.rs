//! InMemoryStorage - HashMap-backed storage for testing and single-process use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{ChangeCallback, Storage, StorageError};
use crate::listener::KeyedListeners;
use crate::subscription::Subscription;
use crate::value::Value;

/// In-memory storage backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same map and the same
/// subscribers, so a write through one clone notifies listeners registered
/// through another. Notifications are delivered synchronously on the writing
/// thread, after the map lock is released.
pub struct InMemoryStorage<R = Value> {
    storage: Arc<RwLock<HashMap<String, R>>>,
    listeners: KeyedListeners<Option<R>>,
}

impl<R> Clone for InMemoryStorage<R> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            listeners: self.listeners.clone(),
        }
    }
}

impl<R> Default for InMemoryStorage<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryStorage<R> {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            listeners: KeyedListeners::new(),
        }
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("keys"))?;
        let mut keys: Vec<String> = storage.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Number of change listeners registered for `key`.
    pub fn listener_count(&self, key: &str) -> usize {
        self.listeners.listener_count(key)
    }
}

impl<R: Clone + Send + Sync + 'static> InMemoryStorage<R> {
    /// Remove every key, notifying the listeners of each removed key.
    pub fn clear(&self) -> Result<(), StorageError> {
        let removed: Vec<String> = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StorageError::LockPoisoned("clear"))?;
            storage.drain().map(|(key, _)| key).collect()
        };
        for key in removed {
            self.listeners.notify(&key, None);
        }
        Ok(())
    }
}

impl<R: Clone + Send + Sync + 'static> Storage for InMemoryStorage<R> {
    type Raw = R;

    fn get(&self, key: &str) -> Result<Option<R>, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("get"))?;
        Ok(storage.get(key).cloned())
    }

    fn set(&self, key: &str, value: R) -> Result<(), StorageError> {
        {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StorageError::LockPoisoned("set"))?;
            storage.insert(key.to_string(), value.clone());
        }
        self.listeners.notify(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let removed = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StorageError::LockPoisoned("remove"))?;
            storage.remove(key).is_some()
        };
        if removed {
            self.listeners.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self, key: &str, on_change: ChangeCallback<R>) -> Subscription {
        self.listeners.subscribe(key, on_change)
    }
}
