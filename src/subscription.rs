use std::fmt;
use std::sync::{Mutex, PoisonError};

type CancelFn = Box<dyn FnOnce() + Send>;

/// Handle for a registered listener.
///
/// Cancelling deregisters the listener; further calls are no-ops. Dropping
/// the handle cancels it, so keep it alive for as long as updates should
/// arrive.
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use persist_rust::Subscription;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
/// let subscription = Subscription::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// subscription.cancel();
/// subscription.cancel();
/// drop(subscription);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct Subscription {
    cancel: Mutex<Option<CancelFn>>,
}

impl Subscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// A handle with nothing to cancel.
    pub fn empty() -> Self {
        Self {
            cancel: Mutex::new(None),
        }
    }

    /// Deregister. Once this returns, the listener receives no further
    /// updates (unless called from inside that listener's own callback, in
    /// which case the current delivery finishes first).
    pub fn cancel(&self) {
        let cancel = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
