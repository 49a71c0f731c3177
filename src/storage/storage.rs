use std::sync::Arc;

use super::StorageError;
use crate::subscription::Subscription;

/// Callback a backend invokes with the new raw value (`None` when removed).
pub type ChangeCallback<R> = Box<dyn Fn(Option<R>) + Send + Sync>;

/// The capability a physical store provides.
///
/// `Raw` is whatever the backend stores natively: [`crate::Value`] for a
/// primitive key-value store, `Vec<u8>` for a blob store, and so on.
///
/// `subscribe` must report every change to `key`, whoever made it, and only
/// changes to `key`. Notifications may be delivered on any thread.
pub trait Storage: Send + Sync {
    type Raw: Clone + Send + Sync + 'static;

    fn get(&self, key: &str) -> Result<Option<Self::Raw>, StorageError>;

    fn set(&self, key: &str, value: Self::Raw) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn subscribe(&self, key: &str, on_change: ChangeCallback<Self::Raw>) -> Subscription;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    type Raw = S::Raw;

    fn get(&self, key: &str) -> Result<Option<Self::Raw>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Self::Raw) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn subscribe(&self, key: &str, on_change: ChangeCallback<Self::Raw>) -> Subscription {
        (**self).subscribe(key, on_change)
    }
}
