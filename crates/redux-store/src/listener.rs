//! Listener registry with copy-on-write snapshots
//!
//! The registry keeps two lists:
//! - `current`: the snapshot handed out for the last notification pass
//! - `next`: the list every subscribe/unsubscribe is applied to
//!
//! Both point at the same allocation until the first mutation after a
//! freeze, at which point `next` is copied. A notification pass iterates the
//! frozen snapshot, so listeners added or removed during the pass only take
//! effect on the following dispatch.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// A callback invoked after every successful dispatch
pub(crate) type Listener = Arc<dyn Fn() + Send + Sync>;

/// One subscription. The id makes every slot distinct, even when the same
/// callback is subscribed twice.
#[derive(Clone)]
pub(crate) struct Slot {
    id: u64,
    listener: Listener,
}

impl Slot {
    pub(crate) fn notify(&self) {
        (self.listener)()
    }
}

pub(crate) struct ListenerRegistry {
    current: Arc<Vec<Slot>>,
    next: Arc<Vec<Slot>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        let empty = Arc::new(Vec::new());
        Self {
            current: empty.clone(),
            next: empty,
            next_id: 0,
        }
    }

    /// Split `next` off `current` if they still share storage
    fn next_mut(&mut self) -> &mut Vec<Slot> {
        if Arc::ptr_eq(&self.next, &self.current) {
            self.next = Arc::new(self.current.as_ref().clone());
        }
        Arc::make_mut(&mut self.next)
    }

    /// Append a listener and return its slot id
    pub(crate) fn subscribe(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.next_mut().push(Slot { id, listener });
        id
    }

    /// Remove the slot with the given id. Returns false if it was already gone.
    pub(crate) fn remove(&mut self, id: u64) -> bool {
        match self.next.iter().position(|slot| slot.id == id) {
            Some(index) => {
                self.next_mut().remove(index);
                true
            }
            None => false,
        }
    }

    /// Freeze `next` as the snapshot for a notification pass
    pub(crate) fn snapshot_and_freeze(&mut self) -> Arc<Vec<Slot>> {
        self.current = self.next.clone();
        self.current.clone()
    }

    /// Number of listeners that will be notified on the next dispatch
    pub(crate) fn len(&self) -> usize {
        self.next.len()
    }
}

/// Handle returned by `subscribe`
///
/// Calling [`Unsubscribe::unsubscribe`] more than once is a no-op, as is
/// calling it after the store has been dropped. Clones share the same
/// subscription.
#[derive(Clone)]
pub struct Unsubscribe {
    inner: Arc<UnsubscribeInner>,
}

struct UnsubscribeInner {
    id: u64,
    subscribed: AtomicBool,
    registry: Weak<Mutex<ListenerRegistry>>,
}

impl Unsubscribe {
    pub(crate) fn new(id: u64, registry: &Arc<Mutex<ListenerRegistry>>) -> Self {
        Self {
            inner: Arc::new(UnsubscribeInner {
                id,
                subscribed: AtomicBool::new(true),
                registry: Arc::downgrade(registry),
            }),
        }
    }

    /// Remove the listener. Takes effect starting with the next dispatch.
    pub fn unsubscribe(&self) {
        if !self.inner.subscribed.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Some(registry) = self.inner.registry.upgrade() {
            if !registry.lock().remove(self.inner.id) {
                log::trace!("Listener slot {} was already removed", self.inner.id);
            }
        }
    }

    /// Returns false once `unsubscribe` has been called
    pub fn is_subscribed(&self) -> bool {
        self.inner.subscribed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("id", &self.inner.id)
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
