//! Trailing debouncer - coalesces bursts of occurrences per key.
//!
//! When a client signal fires rapidly (wheeling, dragging, resizing) we don't
//! want to forward every occurrence. Instead:
//! 1. Each occurrence replaces the pending value for its key and restarts the timer
//! 2. Once the key has been quiet for the whole window, the last value is released
//!
//! Leading occurrences are dropped, never queued. There is no timer thread:
//! the owner calls [`TrailingDebouncer::take_due`] from its own loop.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Default window used for wheel, drag and resize notifications.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Pending<V> {
    value: V,
    due: Instant,
    /// Occurrences folded into this one (including itself)
    count: usize,
}

/// Trailing-edge debouncer keyed by `K`.
///
/// # Usage
/// ```ignore
/// // On each client occurrence:
/// debouncer.offer(key, event, Instant::now());
///
/// // In the host loop:
/// for (key, event) in debouncer.take_due(Instant::now()) {
///     deliver(key, event);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TrailingDebouncer<K, V> {
    window: Duration,
    pending: HashMap<K, Pending<V>>,
}

impl<K: Eq + Hash + Clone, V> Default for TrailingDebouncer<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl<K: Eq + Hash + Clone, V> TrailingDebouncer<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Record an occurrence at `now`.
    /// Replaces any pending value for `key` and restarts its quiet period.
    /// Returns the number of occurrences now folded into the pending one.
    pub fn offer(&mut self, key: K, value: V, now: Instant) -> usize {
        let due = now + self.window;
        let count = self.pending.get(&key).map(|p| p.count + 1).unwrap_or(1);
        self.pending.insert(key, Pending { value, due, count });
        log::trace!(
            "TrailingDebouncer: {} occurrence(s) pending, due in {}ms",
            count,
            self.window.as_millis()
        );
        count
    }

    /// Release every value whose quiet period has elapsed at `now`,
    /// oldest deadline first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let due_keys: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| now >= p.due)
            .map(|(k, _)| k.clone())
            .collect();

        let mut released: Vec<(Instant, K, V)> = due_keys
            .into_iter()
            .filter_map(|k| {
                self.pending.remove(&k).map(|p| {
                    log::trace!("TrailingDebouncer: releasing 1 of {} occurrence(s)", p.count);
                    (p.due, k, p.value)
                })
            })
            .collect();
        released.sort_by_key(|(due, _, _)| *due);
        released.into_iter().map(|(_, k, v)| (k, v)).collect()
    }

    /// Release every value whose key matches `pred` right away, due or not,
    /// oldest deadline first.
    pub fn take_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> Vec<(K, V)> {
        let keys: Vec<K> = self.pending.keys().filter(|k| pred(k)).cloned().collect();
        let mut released: Vec<(Instant, K, V)> = keys
            .into_iter()
            .filter_map(|k| self.pending.remove(&k).map(|p| (p.due, k, p.value)))
            .collect();
        released.sort_by_key(|(due, _, _)| *due);
        if !released.is_empty() {
            log::trace!("TrailingDebouncer: flushing {} pending value(s) early", released.len());
        }
        released.into_iter().map(|(_, k, v)| (k, v)).collect()
    }

    /// Earliest pending deadline, for hosts that want to sleep until then.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }

    /// Drop the pending value for `key`, if any
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Drop every pending value whose key matches `pred`
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|k, _| !pred(k));
        before - self.pending.len()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
