// Response cache for provider tables.
//
// Keys are caller-chosen strings ("box_0022300555"). Entries are shared
// `Arc<Table>` values so a hit hands back the very table that was stored.
// Capacity 0 means unbounded; otherwise the least recently used entry is
// evicted when a new key would exceed the capacity.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::table::Table;

/// Hit/miss/eviction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// LRU cache of provider tables, owned by a single session.
#[derive(Debug, Default)]
pub struct ResponseCache {
    capacity: usize,
    entries: HashMap<String, Arc<Table>>,
    /// Keys from least to most recently used.
    order: VecDeque<String>,
    stats: CacheStats,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        ResponseCache {
            capacity,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<Arc<Table>> {
        match self.entries.get(key) {
            Some(table) => {
                let table = Arc::clone(table);
                self.stats.hits += 1;
                self.touch(key);
                Some(table)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store `table` under `key`, replacing any previous entry.
    pub fn put(&mut self, key: impl Into<String>, table: Arc<Table>) {
        let key = key.into();
        if self.entries.insert(key.clone(), table).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);

        if self.capacity > 0 {
            while self.entries.len() > self.capacity {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
                debug!(key = %oldest, "evicted cached response");
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(tag: i64) -> Arc<Table> {
        Arc::new(Table::new(vec!["v".into()], vec![vec![json!(tag)]]))
    }

    #[test]
    fn get_returns_identical_table() {
        let mut cache = ResponseCache::new(4);
        let stored = table(1);
        cache.put("box_1", Arc::clone(&stored));
        let hit = cache.get("box_1").unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 0, evictions: 0 });
    }

    #[test]
    fn miss_is_counted() {
        let mut cache = ResponseCache::new(4);
        assert!(cache.get("nope").is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = ResponseCache::new(2);
        cache.put("a", table(1));
        cache.put("b", table(2));
        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.put("c", table(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn replacing_a_key_does_not_grow() {
        let mut cache = ResponseCache::new(2);
        cache.put("a", table(1));
        cache.put("a", table(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().len(), 1);
    }

    #[test]
    fn unbounded_never_evicts() {
        let mut cache = ResponseCache::new(0);
        for i in 0..1000 {
            cache.put(format!("k{i}"), table(i));
        }
        assert_eq!(cache.len(), 1000);
        assert_eq!(cache.stats().evictions, 0);
    }
}
