use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::ListenerSet;
use crate::subscription::Subscription;

/// Per-key subscription table for backends.
///
/// A change to one key is dispatched only to the listeners registered for
/// exactly that key. Entries are dropped once their last listener goes away.
pub struct KeyedListeners<T> {
    table: Arc<RwLock<HashMap<String, ListenerSet<T>>>>,
}

impl<T> Clone for KeyedListeners<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<T> Default for KeyedListeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyedListeners<T> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of listeners registered for `key`.
    pub fn listener_count(&self, key: &str) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(ListenerSet::len)
            .unwrap_or(0)
    }

    /// Keys with at least one listener.
    pub fn keys(&self) -> Vec<String> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl<T: Send + 'static> KeyedListeners<T> {
    pub fn subscribe<F>(&self, key: &str, callback: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = self
            .table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .insert(callback);

        let table = Arc::downgrade(&self.table);
        let key = key.to_string();
        Subscription::new(move || {
            let Some(table) = table.upgrade() else {
                return;
            };
            let set = table
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&key)
                .cloned();
            if let Some(set) = set {
                set.remove(id);
                let mut table = table.write().unwrap_or_else(PoisonError::into_inner);
                if table.get(&key).is_some_and(ListenerSet::is_empty) {
                    table.remove(&key);
                }
            }
        })
    }
}

impl<T: Clone> KeyedListeners<T> {
    pub fn notify(&self, key: &str, event: T) {
        let set = self
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        if let Some(set) = set {
            set.emit(event);
        }
    }
}
