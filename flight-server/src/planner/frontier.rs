//! Frontier: the open set of the search, ordered by estimated total cost.
//!
//! Holds at most one live entry per key. Upserting a key replaces its entry
//! outright; superseded heap items are skipped lazily on pop.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// Heap item. Ordered so that the max-heap yields the smallest `f` first,
/// breaking ties by insertion order.
#[derive(Debug)]
struct Slot<K> {
    f: f64,
    seq: u64,
    key: K,
}

impl<K> Ord for Slot<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<K> PartialOrd for Slot<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> PartialEq for Slot<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for Slot<K> {}

#[derive(Debug)]
struct Live<V> {
    seq: u64,
    f: f64,
    value: V,
}

/// Priority queue keyed by `K` with pop-minimum and upsert.
#[derive(Debug)]
pub struct Frontier<K, V> {
    heap: BinaryHeap<Slot<K>>,
    live: HashMap<K, Live<V>>,
    next_seq: u64,
}

impl<K: Copy + Eq + Hash, V> Frontier<K, V> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Insert or replace the entry for `key`.
    pub fn upsert(&mut self, key: K, f: f64, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(key, Live { seq, f, value });
        self.heap.push(Slot { f, seq, key });
    }

    /// Remove and return the entry with the smallest `f`.
    ///
    /// Among equal `f`, the entry upserted first is returned first.
    pub fn pop(&mut self) -> Option<(K, f64, V)> {
        while let Some(slot) = self.heap.pop() {
            let current = self
                .live
                .get(&slot.key)
                .is_some_and(|live| live.seq == slot.seq);
            if !current {
                continue;
            }
            if let Some(live) = self.live.remove(&slot.key) {
                return Some((slot.key, live.f, live.value));
            }
        }
        None
    }

    /// The live entry for `key`, if any.
    #[cfg(test)]
    pub fn get(&self, key: &K) -> Option<(f64, &V)> {
        self.live.get(key).map(|live| (live.f, &live.value))
    }

    #[cfg(test)]
    pub fn contains(&self, key: &K) -> bool {
        self.live.contains_key(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<K: Copy + Eq + Hash, V> Default for Frontier<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
