//! # Piece-Count Memoization Cache
//!
//! Memoizes the token counts of repeated pieces. The reference behavior
//! is an unbounded concurrent map; here the bound is explicit
//! configuration, with `None` restoring the unbounded behavior.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::types::TeHashMap;

struct CountCacheInner {
    map: TeHashMap<String, usize>,
    order: VecDeque<String>,
}

/// A capacity-bounded memoization cache of piece token counts.
///
/// Concurrent readers and writers are serialized by an internal lock;
/// eviction is insertion-ordered (oldest entry first).
pub struct CountCache {
    capacity: Option<usize>,
    inner: Mutex<CountCacheInner>,
}

impl CountCache {
    /// Create a new count cache.
    ///
    /// ## Arguments
    /// * `capacity` - The maximum number of entries; `None` is unbounded.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CountCacheInner {
                map: TeHashMap::default(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Get the configured capacity.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Get the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the memoized count for a piece.
    pub fn get(
        &self,
        piece: &str,
    ) -> Option<usize> {
        self.inner.lock().map.get(piece).copied()
    }

    /// Memoize the count for a piece.
    ///
    /// A piece that is already present keeps its original value; counts
    /// are pure functions of the piece, so the values agree.
    pub fn insert(
        &self,
        piece: &str,
        count: usize,
    ) {
        let mut inner = self.inner.lock();
        if inner.map.contains_key(piece) {
            return;
        }

        if let Some(capacity) = self.capacity {
            while inner.map.len() >= capacity {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.map.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        inner.map.insert(piece.to_string(), count);
        inner.order.push_back(piece.to_string());
    }
}
