//! Copy-on-write map from format string to compiled format.
//!
//! Readers load the current snapshot without locking. Writers serialize on
//! a mutex, re-check the latest snapshot, clone it, insert, and publish the
//! new map atomically. Entries are never replaced or evicted.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use strfmt_core::CompiledFormat;

type Snapshot = HashMap<Box<str>, Arc<CompiledFormat>>;

pub struct FormatCache {
    snapshot: ArcSwap<Snapshot>,
    write_lock: Mutex<()>,
}

impl FormatCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Lock-free lookup.
    #[must_use]
    pub fn get(&self, format: &str) -> Option<Arc<CompiledFormat>> {
        self.snapshot.load().get(format).cloned()
    }

    /// Publish `compiled` under `format` unless an entry already exists.
    /// Returns `true` if this call inserted it.
    pub fn insert(&self, format: &str, compiled: Arc<CompiledFormat>) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();
        if current.contains_key(format) {
            return false;
        }
        let mut next = HashMap::with_capacity(current.len() + 1);
        next.extend(current.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
        next.insert(Box::from(format), compiled);
        self.snapshot.store(Arc::new(next));
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Drop every entry. Readers holding an older snapshot keep it.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock();
        self.snapshot.store(Arc::new(HashMap::new()));
    }
}

impl Default for FormatCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatCache").field("entries", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strfmt_core::compile;

    #[test]
    fn empty_cache_misses() {
        let cache = FormatCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("%s").is_none());
    }

    #[test]
    fn insert_then_get() {
        let cache = FormatCache::new();
        let compiled = Arc::new(compile("%s!"));
        assert!(cache.insert("%s!", Arc::clone(&compiled)));
        let hit = cache.get("%s!").unwrap();
        assert!(Arc::ptr_eq(&hit, &compiled));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn first_insert_wins() {
        let cache = FormatCache::new();
        let first = Arc::new(compile("%q"));
        let second = Arc::new(compile("%q"));
        assert!(cache.insert("%q", Arc::clone(&first)));
        assert!(!cache.insert("%q", second));
        assert!(Arc::ptr_eq(&cache.get("%q").unwrap(), &first));
    }

    #[test]
    fn old_snapshot_survives_insert() {
        let cache = FormatCache::new();
        cache.insert("a", Arc::new(compile("a")));
        let before = cache.snapshot.load_full();
        cache.insert("b", Arc::new(compile("b")));
        assert_eq!(before.len(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let cache = FormatCache::new();
        cache.insert("a", Arc::new(compile("a")));
        cache.clear();
        assert!(cache.is_empty());
    }
}
