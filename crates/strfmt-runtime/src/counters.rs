//! Miss counters for formats not yet promoted into the cache.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Mutex-guarded miss counts, allocated on first use.
#[derive(Debug, Default)]
pub struct UsageCounters {
    counts: Mutex<Option<HashMap<Box<str>, usize>>>,
}

impl UsageCounters {
    #[must_use]
    pub const fn new() -> Self {
        Self { counts: Mutex::new(None) }
    }

    /// Record one more miss for `format` and return the updated count.
    pub fn bump(&self, format: &str) -> usize {
        let mut guard = self.counts.lock();
        let counts = guard.get_or_insert_with(HashMap::new);
        match counts.get_mut(format) {
            Some(n) => {
                *n = n.saturating_add(1);
                *n
            }
            None => {
                counts.insert(Box::from(format), 1);
                1
            }
        }
    }

    pub fn remove(&self, format: &str) {
        if let Some(counts) = self.counts.lock().as_mut() {
            counts.remove(format);
        }
    }

    #[must_use]
    pub fn get(&self, format: &str) -> usize {
        self.counts
            .lock()
            .as_ref()
            .and_then(|counts| counts.get(format).copied())
            .unwrap_or(0)
    }

    /// Number of formats currently being counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.lock().as_ref().map_or(0, HashMap::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        *self.counts.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_counts_up() {
        let counters = UsageCounters::new();
        assert_eq!(counters.bump("%s"), 1);
        assert_eq!(counters.bump("%s"), 2);
        assert_eq!(counters.bump("%q"), 1);
        assert_eq!(counters.get("%s"), 2);
        assert_eq!(counters.len(), 2);
    }

    #[test]
    fn remove_resets() {
        let counters = UsageCounters::new();
        counters.bump("%s");
        counters.remove("%s");
        assert_eq!(counters.get("%s"), 0);
        assert!(counters.is_empty());
        assert_eq!(counters.bump("%s"), 1);
    }

    #[test]
    fn untouched_counters_stay_unallocated() {
        let counters = UsageCounters::new();
        counters.remove("%s");
        assert!(counters.counts.lock().is_none());
    }
}
