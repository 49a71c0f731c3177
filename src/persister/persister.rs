use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, warn};

use super::codec::{Codec, Required};
use super::{DefaultValuePolicy, PersisterBuilder, Updates};
use crate::error::PersistenceError;
use crate::listener::{ListenerId, ListenerSet};
use crate::storage::Storage;
use crate::subscription::Subscription;
use crate::transformer::Transformer;

/// What update listeners receive: the typed value, or why it couldn't be
/// produced.
pub type Update<V> = Result<V, PersistenceError>;

pub(crate) type DefaultFn<V> = Box<dyn Fn() -> V + Send + Sync>;

/// Binds one key in one backend to a typed value.
///
/// Reads run the transformer chain backwards and apply the
/// [`DefaultValuePolicy`]; writes run it forwards. Update listeners observe
/// every change the backend reports for the key, whoever made it.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use persist_rust::{InMemoryStorage, Persister, StorableTransformer, Storage, Value};
///
/// let storage = Arc::new(InMemoryStorage::new());
/// let persister = Persister::new(
///     "launch-count",
///     storage.clone(),
///     StorableTransformer::<i64>::new(),
///     || 0,
/// );
///
/// assert_eq!(persister.retrieve().unwrap(), 0);
///
/// persister.persist(&3).unwrap();
/// assert_eq!(persister.retrieve().unwrap(), 3);
/// assert_eq!(storage.get("launch-count").unwrap(), Some(Value::Int64(3)));
/// ```
pub struct Persister<V, S: Storage> {
    inner: Arc<Inner<V, S>>,
}

struct Inner<V, S: Storage> {
    key: String,
    storage: Arc<S>,
    codec: Box<dyn Codec<V, S::Raw>>,
    default_value: DefaultFn<V>,
    policy: DefaultValuePolicy,
    listeners: ListenerSet<Update<V>>,
    /// The single backend subscription shared by all listeners; `None` while
    /// no listener is registered.
    backend: Mutex<Option<Subscription>>,
}

impl<V, S> Persister<V, S>
where
    V: Clone + Send + 'static,
    S: Storage + 'static,
{
    /// Create a persister with an empty [`DefaultValuePolicy`]. Use
    /// [`PersisterBuilder`] to configure the policy or store optionals.
    pub fn new<T, F>(
        key: impl Into<String>,
        storage: Arc<S>,
        transformer: T,
        default_value: F,
    ) -> Self
    where
        T: Transformer<Input = V, Output = S::Raw> + 'static,
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self::from_parts(
            key.into(),
            storage,
            Box::new(Required(transformer)),
            Box::new(default_value),
            DefaultValuePolicy::NONE,
        )
    }

    pub(crate) fn from_parts(
        key: String,
        storage: Arc<S>,
        codec: Box<dyn Codec<V, S::Raw>>,
        default_value: DefaultFn<V>,
        policy: DefaultValuePolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                key,
                storage,
                codec,
                default_value,
                policy,
                listeners: ListenerSet::new(),
                backend: Mutex::new(None),
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.inner.storage
    }

    pub fn policy(&self) -> DefaultValuePolicy {
        self.inner.policy
    }

    /// Evaluate the default-value supplier.
    pub fn default_value(&self) -> V {
        (self.inner.default_value)()
    }

    /// Read the value, applying the default-value policy.
    ///
    /// Returns the default when nothing is stored (writing it back if
    /// [`DefaultValuePolicy::PERSIST_WHEN_ABSENT`] is set). A stored value
    /// that cannot be read is an error unless
    /// [`DefaultValuePolicy::DEFAULT_ON_ERROR`] is set. Backend failures
    /// always propagate.
    pub fn retrieve(&self) -> Result<V, PersistenceError> {
        let raw = self.inner.storage.get(&self.inner.key)?;
        self.inner.resolve(raw, true)
    }

    /// Read the stored value without any default: absence is
    /// [`PersistenceError::ValueAbsent`].
    pub fn retrieve_stored(&self) -> Result<V, PersistenceError> {
        match self.inner.storage.get(&self.inner.key)? {
            Some(raw) => Ok(self.inner.codec.decode(raw)?),
            None => Err(PersistenceError::ValueAbsent {
                key: self.inner.key.clone(),
            }),
        }
    }

    /// Transform and store `value`. Listeners hear about it through the
    /// backend's change feed, not from the persister directly.
    pub fn persist(&self, value: &V) -> Result<(), PersistenceError> {
        self.inner.write(value)
    }

    /// Remove the stored value; the next read sees absence.
    pub fn remove_value(&self) -> Result<(), PersistenceError> {
        self.inner.storage.remove(&self.inner.key)?;
        Ok(())
    }

    /// Register `listener` for every change the backend reports for this key.
    ///
    /// The first listener subscribes the persister to the backend; cancelling
    /// the last one unsubscribes it.
    pub fn add_update_listener<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Update<V>) + Send + Sync + 'static,
    {
        let id = self.inner.add_listener(listener);
        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.remove_listener(id);
            }
        })
    }

    /// Pull-based variant of [`Persister::add_update_listener`].
    pub fn updates(&self) -> Updates<V> {
        Updates::new(self)
    }

    /// Whether the persister currently holds a backend subscription.
    pub fn is_subscribed(&self) -> bool {
        self.inner
            .backend
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl<S: Storage + 'static> Persister<(), S> {
    /// Start configuring a persister for `key` in `storage`.
    pub fn builder(key: impl Into<String>, storage: Arc<S>) -> PersisterBuilder<S> {
        PersisterBuilder::new(key, storage)
    }
}

impl<V, S> Inner<V, S>
where
    V: Clone + Send + 'static,
    S: Storage + 'static,
{
    fn write(&self, value: &V) -> Result<(), PersistenceError> {
        match self.codec.encode(value)? {
            Some(raw) => self.storage.set(&self.key, raw)?,
            None => self.storage.remove(&self.key)?,
        }
        Ok(())
    }

    /// Turn a raw backend value into what a reader sees. `write_back`
    /// enables the policy's persisting flags; notifications never write.
    fn resolve(&self, raw: Option<S::Raw>, write_back: bool) -> Result<V, PersistenceError> {
        let raw = match raw {
            Some(raw) => raw,
            None => {
                let default = (self.default_value)();
                if write_back && self.policy.contains(DefaultValuePolicy::PERSIST_WHEN_ABSENT) {
                    self.persist_default(&default);
                }
                return Ok(default);
            }
        };

        match self.codec.decode(raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                let err = PersistenceError::from(err);
                if !self.policy.contains(DefaultValuePolicy::DEFAULT_ON_ERROR) {
                    return Err(err);
                }
                debug!(key = %self.key, error = %err, "stored value unreadable, using default");
                let default = (self.default_value)();
                if write_back && self.policy.contains(DefaultValuePolicy::PERSIST_ON_ERROR) {
                    self.persist_default(&default);
                }
                Ok(default)
            }
        }
    }

    fn persist_default(&self, default: &V) {
        if let Err(err) = self.write(default) {
            warn!(key = %self.key, error = %err, "failed to persist default value");
        }
    }

    fn dispatch(&self, raw: Option<S::Raw>) {
        let update = self.resolve(raw, false);
        self.listeners.emit(update);
    }

    fn add_listener<F>(self: &Arc<Self>, listener: F) -> ListenerId
    where
        F: Fn(Update<V>) + Send + Sync + 'static,
    {
        let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
        let id = self.listeners.insert(listener);
        if backend.is_none() {
            let inner: Weak<Self> = Arc::downgrade(self);
            *backend = Some(self.storage.subscribe(
                &self.key,
                Box::new(move |raw| {
                    if let Some(inner) = inner.upgrade() {
                        inner.dispatch(raw);
                    }
                }),
            ));
            debug!(key = %self.key, "subscribed to backend changes");
        }
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        // Removal may wait for an in-flight delivery, so it happens before
        // taking the backend lock.
        if !self.listeners.remove(id) {
            return;
        }
        let subscription = {
            let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
            if self.listeners.is_empty() {
                backend.take()
            } else {
                None
            }
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
            debug!(key = %self.key, "unsubscribed from backend changes");
        }
    }
}

impl<V, S: Storage> fmt::Debug for Persister<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persister")
            .field("key", &self.inner.key)
            .field("policy", &self.inner.policy)
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}
