//! Per-kind listener registry with revocable subscriptions.
//!
//! Architecture:
//! - Listeners subscribe to one event kind and get back a [`Registration`]
//! - emit() invokes every listener of that kind synchronously
//! - Registration::remove() revokes a single subscription
//!
//! Callback order: FIFO (first-subscribed, first-called) within the same kind.
//! The same closure subscribed twice is called twice; nothing is deduplicated.
//!
//! emit() copies the listener list before invoking anything, so a listener may
//! subscribe or revoke (itself or others) while a delivery is in progress. The
//! in-progress delivery keeps using the copy; changes apply from the next emit.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, Weak};

/// Type-erased listener
pub type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Identifier of a single subscription, unique per bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Subscribers<K, E> {
    next_id: u64,
    by_kind: HashMap<K, IndexMap<ListenerId, Callback<E>>>,
}

impl<K: Eq + Hash, E> Subscribers<K, E> {
    fn remove(&mut self, kind: &K, id: ListenerId) -> bool {
        let Some(listeners) = self.by_kind.get_mut(kind) else {
            return false;
        };
        let removed = listeners.shift_remove(&id).is_some();
        if listeners.is_empty() {
            self.by_kind.remove(kind);
        }
        removed
    }
}

/// Listener registry keyed by event kind.
///
/// Cloning shares the same registry.
pub struct EventBus<K, E> {
    subscribers: Arc<RwLock<Subscribers<K, E>>>,
}

impl<K, E> Clone for EventBus<K, E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<K, E> Default for EventBus<K, E>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
    E: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> EventBus<K, E>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
    E: 'static,
{
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Subscribers {
                next_id: 0,
                by_kind: HashMap::new(),
            })),
        }
    }

    /// Subscribe `callback` to events of `kind`.
    ///
    /// # Example
    /// ```ignore
    /// let reg = bus.subscribe(EventKind::Drag, |e| println!("{e:?}"));
    /// // ...
    /// reg.remove();
    /// ```
    pub fn subscribe<F>(&self, kind: K, callback: F) -> Registration
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        let id = ListenerId(subs.next_id);
        subs.next_id += 1;
        subs.by_kind
            .entry(kind)
            .or_default()
            .insert(id, Arc::new(callback));

        let weak: Weak<RwLock<Subscribers<K, E>>> = Arc::downgrade(&self.subscribers);
        Registration {
            id,
            revoke: Some(Box::new(move || {
                // Bus already dropped: nothing left to deliver to
                let Some(subs) = weak.upgrade() else {
                    return false;
                };
                let mut subs = subs.write().unwrap_or_else(|e| e.into_inner());
                subs.remove(&kind, id)
            })),
        }
    }

    /// Deliver `event` to every listener of `kind` in subscription order.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, kind: K, event: &E) -> usize {
        // Snapshot, then release the lock before calling out
        let snapshot: Vec<Callback<E>> = {
            let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
            match subs.by_kind.get(&kind) {
                Some(listeners) => listeners.values().cloned().collect(),
                None => return 0,
            }
        };
        for cb in &snapshot {
            cb(event);
        }
        snapshot.len()
    }

    /// Number of active subscriptions for `kind`
    pub fn subscriber_count(&self, kind: K) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .by_kind
            .get(&kind)
            .map(|l| l.len())
            .unwrap_or(0)
    }

    pub fn has_subscribers(&self, kind: K) -> bool {
        self.subscriber_count(kind) > 0
    }
}

/// Handle for one subscription.
///
/// Dropping it does NOT unsubscribe; call [`Registration::remove`].
pub struct Registration {
    id: ListenerId,
    revoke: Option<Box<dyn FnOnce() -> bool + Send + Sync>>,
}

impl Registration {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Revoke the subscription. No further delivery to this listener happens
    /// after this returns. Returns false if it was already gone.
    pub fn remove(mut self) -> bool {
        self.revoke.take().map(|revoke| revoke()).unwrap_or(false)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}
