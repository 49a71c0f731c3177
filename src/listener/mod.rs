//! Listener registries used for change notification.
//!
//! [`ListenerSet`] fans one stream of events out to many callbacks.
//! [`KeyedListeners`] is the per-key table a backend keeps so that a change
//! to one key reaches only the listeners registered for that key.

mod keyed;
mod listener_set;

pub use keyed::KeyedListeners;
pub use listener_set::{ListenerId, ListenerSet};
