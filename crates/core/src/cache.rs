//! Explicit memoization cache
//!
//! Components that memoize expensive lookups own a `Memo` and invalidate it
//! themselves. There is no process-wide cache.

use indexmap::IndexMap;
use std::hash::Hash;

/// Key/value memoization with explicit invalidation
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> Memo<K, V> {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached value
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    ///
    /// Errors from `f` are returned and nothing is cached.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: K, f: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let index = match self.entries.get_index_of(&key) {
            Some(index) => index,
            None => {
                let value = f()?;
                self.entries.insert_full(key, value).0
            }
        };
        Ok(&self.entries[index])
    }

    /// Drop a single entry, returning it if present
    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once() {
        let calls = Cell::new(0);
        let mut memo: Memo<&str, u32> = Memo::new();

        for _ in 0..3 {
            let value = memo
                .get_or_try_insert_with("k", || {
                    calls.set(calls.get() + 1);
                    Ok::<_, ()>(7)
                })
                .unwrap();
            assert_eq!(*value, 7);
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_error_is_not_cached() {
        let mut memo: Memo<&str, u32> = Memo::new();
        let result = memo.get_or_try_insert_with("k", || Err("nope"));
        assert_eq!(result, Err("nope"));
        assert!(memo.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut memo: Memo<u8, u8> = Memo::new();
        memo.get_or_try_insert_with(1, || Ok::<_, ()>(10)).unwrap();
        memo.get_or_try_insert_with(2, || Ok::<_, ()>(20)).unwrap();

        assert_eq!(memo.invalidate(&1), Some(10));
        assert!(memo.get(&1).is_none());
        assert_eq!(memo.get(&2), Some(&20));

        memo.clear();
        assert!(memo.is_empty());
    }
}
