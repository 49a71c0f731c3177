//! Storage - the capability a physical backend provides.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Persister (one key each)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Storage Trait                           │
//! │  get(key) / set(key, raw) / remove(key) / subscribe(key)    │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//! ┌───────────────┐   ┌─────────────┐    ┌─────────────────────┐
//! │InMemoryStorage│   │ FileStorage │    │ cloud KV store      │
//! │  (included)   │   │ (included)  │    │    (external)       │
//! └───────────────┘   └─────────────┘    └─────────────────────┘
//! ```
//!
//! Backends keep a [`crate::KeyedListeners`] table so that a change to one key
//! is dispatched only to listeners of that key.

mod error;
#[cfg(feature = "file")]
mod file;
mod in_memory;
mod storage;

pub use error::StorageError;
#[cfg(feature = "file")]
pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
pub use storage::{ChangeCallback, Storage};
