//! Typed key-value persistence.
//!
//! A [`Persister`] binds one key in one [`Storage`] backend to a typed value,
//! passing it through a reversible [`Transformer`] chain and falling back to
//! a lazily computed default governed by a [`DefaultValuePolicy`]. Update
//! listeners observe every change the backend reports for the key.

mod error;
mod listener;
mod persister;
mod storage;
mod subscription;
mod transformer;
mod value;

pub use error::PersistenceError;
pub use listener::{KeyedListeners, ListenerId, ListenerSet};
pub use persister::{DefaultValuePolicy, Persister, PersisterBuilder, Update, Updates};
#[cfg(feature = "file")]
pub use storage::FileStorage;
pub use storage::{ChangeCallback, InMemoryStorage, Storage, StorageError};
pub use subscription::Subscription;
#[cfg(feature = "bitcode")]
pub use transformer::BitcodeTransformer;
pub use transformer::{
    Base64Transformer, Chain, FnTransformer, JsonTransformer, StorableTransformer,
    TransformError, Transformer,
};
pub use value::{Storable, Value};
