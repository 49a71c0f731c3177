use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use tracing::warn;

/// Identifier of a callback registered in a [`ListenerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Callback<T> = Box<dyn Fn(T) + Send + Sync>;

struct SlotState {
    active: bool,
    /// One entry per delivery currently running the callback. Nested
    /// deliveries on the same thread push the same id again.
    in_flight: Vec<ThreadId>,
}

struct Slot<T> {
    callback: Callback<T>,
    state: Mutex<SlotState>,
    drained: Condvar,
}

impl<T> Slot<T> {
    fn new(callback: Callback<T>) -> Self {
        Self {
            callback,
            state: Mutex::new(SlotState {
                active: true,
                in_flight: Vec::new(),
            }),
            drained: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the callback unless the slot was deactivated. Deliveries never
    /// wait for each other; only `deactivate` waits for them.
    fn deliver(&self, event: T) {
        let current = thread::current().id();
        {
            let mut state = self.lock();
            if !state.active {
                return;
            }
            state.in_flight.push(current);
        }

        self.invoke(event);

        let mut state = self.lock();
        if let Some(pos) = state.in_flight.iter().position(|id| *id == current) {
            state.in_flight.swap_remove(pos);
        }
        drop(state);
        self.drained.notify_all();
    }

    fn invoke(&self, event: T) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.callback)(event)));
        if result.is_err() {
            warn!("listener panicked; continuing with remaining listeners");
        }
    }

    /// Stop deliveries and wait for those in flight on other threads. A
    /// delivery running on the calling thread is left to finish.
    fn deactivate(&self) {
        let current = thread::current().id();
        let mut state = self.lock();
        state.active = false;
        while state.in_flight.iter().any(|id| *id != current) {
            state = self
                .drained
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

struct Registry<T> {
    next_id: AtomicU64,
    slots: RwLock<BTreeMap<ListenerId, Arc<Slot<T>>>>,
}

/// A set of callbacks that all receive every emitted event.
///
/// Emitting never holds the set's lock while callbacks run, so a callback may
/// register, remove (including itself) or trigger another emit. Removing a
/// listener is effective immediately: after [`ListenerSet::remove`] returns,
/// the callback is not invoked again. A panicking callback is logged and does
/// not affect the others.
pub struct ListenerSet<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Clone for ListenerSet<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListenerSet<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                slots: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    pub fn insert<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = ListenerId(self.registry.next_id.fetch_add(1, Ordering::SeqCst));
        let slot = Arc::new(Slot::new(Box::new(callback)));
        self.registry
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, slot);
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn remove(&self, id: ListenerId) -> bool {
        let slot = self
            .registry
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        match slot {
            Some(slot) => {
                slot.deactivate();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.registry
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> ListenerSet<T> {
    /// Deliver `event` to every registered listener once.
    pub fn emit(&self, event: T) {
        let slots: Vec<Arc<Slot<T>>> = self
            .registry
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for slot in slots {
            slot.deliver(event.clone());
        }
    }
}
