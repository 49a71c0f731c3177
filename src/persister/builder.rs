use std::sync::Arc;

use super::codec::{Optional, Required};
use super::{DefaultValuePolicy, Persister};
use crate::storage::Storage;
use crate::transformer::{StorableTransformer, Transformer};
use crate::value::{Storable, Value};

/// Configures a [`Persister`].
///
/// The key, backend and policy are set here; the transformer chain and
/// default-value supplier are given to the `build*` method, which fixes the
/// persister's value type.
///
/// ```
/// use std::sync::Arc;
/// use persist_rust::{DefaultValuePolicy, InMemoryStorage, Persister, Storage, Value};
///
/// let storage = Arc::new(InMemoryStorage::new());
/// let volume = Persister::builder("volume", storage.clone())
///     .default_value_policy(DefaultValuePolicy::PERSIST_WHEN_ABSENT)
///     .build_storable(|| 0.5f64);
///
/// assert_eq!(volume.retrieve().unwrap(), 0.5);
/// assert_eq!(storage.get("volume").unwrap(), Some(Value::Double(0.5)));
///
/// let nickname = Persister::builder("nickname", storage).build_optional_storable::<String>();
/// assert_eq!(nickname.retrieve().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct PersisterBuilder<S> {
    key: String,
    storage: Arc<S>,
    policy: DefaultValuePolicy,
}

impl<S: Storage + 'static> PersisterBuilder<S> {
    pub fn new(key: impl Into<String>, storage: Arc<S>) -> Self {
        Self {
            key: key.into(),
            storage,
            policy: DefaultValuePolicy::NONE,
        }
    }

    pub fn default_value_policy(mut self, policy: DefaultValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A persister for `T::Input`, stored through `transformer`.
    pub fn build<T, F>(self, transformer: T, default_value: F) -> Persister<T::Input, S>
    where
        T: Transformer<Output = S::Raw> + 'static,
        T::Input: Clone + Send + 'static,
        F: Fn() -> T::Input + Send + Sync + 'static,
    {
        Persister::from_parts(
            self.key,
            self.storage,
            Box::new(Required(transformer)),
            Box::new(default_value),
            self.policy,
        )
    }

    /// A persister for `Option<T::Input>` defaulting to `None`. Persisting
    /// `None` removes the key.
    pub fn build_optional<T>(self, transformer: T) -> Persister<Option<T::Input>, S>
    where
        T: Transformer<Output = S::Raw> + 'static,
        T::Input: Clone + Send + 'static,
    {
        self.build_optional_with_default(transformer, || None)
    }

    /// Like [`PersisterBuilder::build_optional`] with a custom default.
    pub fn build_optional_with_default<T, F>(
        self,
        transformer: T,
        default_value: F,
    ) -> Persister<Option<T::Input>, S>
    where
        T: Transformer<Output = S::Raw> + 'static,
        T::Input: Clone + Send + 'static,
        F: Fn() -> Option<T::Input> + Send + Sync + 'static,
    {
        Persister::from_parts(
            self.key,
            self.storage,
            Box::new(Optional(transformer)),
            Box::new(default_value),
            self.policy,
        )
    }
}

impl<S: Storage<Raw = Value> + 'static> PersisterBuilder<S> {
    /// A persister for a primitive type stored as a [`Value`] directly.
    pub fn build_storable<V, F>(self, default_value: F) -> Persister<V, S>
    where
        V: Storable + Clone + Send + 'static,
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.build(StorableTransformer::<V>::new(), default_value)
    }

    pub fn build_optional_storable<V>(self) -> Persister<Option<V>, S>
    where
        V: Storable + Clone + Send + 'static,
    {
        self.build_optional(StorableTransformer::<V>::new())
    }

    /// Run `transformer` first, then cast its output to a [`Value`].
    pub fn build_with<T, F>(self, transformer: T, default_value: F) -> Persister<T::Input, S>
    where
        T: Transformer + 'static,
        T::Input: Clone + Send + 'static,
        T::Output: Storable + 'static,
        F: Fn() -> T::Input + Send + Sync + 'static,
    {
        self.build(
            transformer.append(StorableTransformer::<T::Output>::new()),
            default_value,
        )
    }

    /// Optional counterpart of [`PersisterBuilder::build_with`].
    pub fn build_optional_with<T>(self, transformer: T) -> Persister<Option<T::Input>, S>
    where
        T: Transformer + 'static,
        T::Input: Clone + Send + 'static,
        T::Output: Storable + 'static,
    {
        self.build_optional(transformer.append(StorableTransformer::<T::Output>::new()))
    }
}
