use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use super::{Persister, Update};
use crate::storage::Storage;
use crate::subscription::Subscription;

/// A stream of a persister's updates.
///
/// This is a pull-based interface over
/// [`Persister::add_update_listener`]: updates queue up until read. Dropping
/// the stream cancels the underlying listener. Iterating blocks until the next
/// update and ends once the persister is gone.
///
/// ```
/// use std::sync::Arc;
/// use persist_rust::{InMemoryStorage, Persister, StorableTransformer};
///
/// let storage = Arc::new(InMemoryStorage::new());
/// let persister = Persister::new("name", storage, StorableTransformer::<String>::new(), String::new);
/// let updates = persister.updates();
///
/// persister.persist(&"value".to_string()).unwrap();
/// assert_eq!(updates.try_next(), Some(Ok("value".to_string())));
/// assert_eq!(updates.try_next(), None);
/// ```
pub struct Updates<V> {
    receiver: Receiver<Update<V>>,
    subscription: Subscription,
}

impl<V: Clone + Send + 'static> Updates<V> {
    pub(crate) fn new<S: Storage + 'static>(persister: &Persister<V, S>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let subscription = persister.add_update_listener(move |update| {
            // The receiver may already be gone while a delivery is in flight.
            let _ = sender.send(update);
        });
        Self {
            receiver,
            subscription,
        }
    }
}

impl<V> Updates<V> {
    /// Wait up to `timeout_ms` for the next update.
    pub fn poll(&self, timeout_ms: u64) -> Option<Update<V>> {
        match self
            .receiver
            .recv_timeout(Duration::from_millis(timeout_ms))
        {
            Ok(update) => Some(update),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// The next queued update, without waiting.
    pub fn try_next(&self) -> Option<Update<V>> {
        match self.receiver.try_recv() {
            Ok(update) => Some(update),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Stop receiving. Already queued updates can still be read.
    pub fn cancel(&self) {
        self.subscription.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.subscription.is_cancelled()
    }
}

impl<V> Iterator for Updates<V> {
    type Item = Update<V>;

    fn next(&mut self) -> Option<Update<V>> {
        self.receiver.recv().ok()
    }
}
