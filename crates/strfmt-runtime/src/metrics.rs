//! Atomic counters for cache observability.
//!
//! Relaxed ordering throughout; the numbers are diagnostic only.

use std::sync::atomic::{AtomicU64, Ordering};

pub struct FormatMetrics {
    /// Compile-or-lookup calls.
    pub lookups: AtomicU64,
    /// Lookups answered from the cache.
    pub hits: AtomicU64,
    /// Lookups that had to compile.
    pub misses: AtomicU64,
    /// Formats inserted into the cache.
    pub promotions: AtomicU64,
    /// Promotions lost to a concurrent insert of the same format.
    pub duplicate_promotions: AtomicU64,
}

impl FormatMetrics {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lookups: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
            duplicate_promotions: AtomicU64::new(0),
        }
    }

    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn snapshot(&self) -> FormatMetricsSnapshot {
        FormatMetricsSnapshot {
            lookups: Self::get(&self.lookups),
            hits: Self::get(&self.hits),
            misses: Self::get(&self.misses),
            promotions: Self::get(&self.promotions),
            duplicate_promotions: Self::get(&self.duplicate_promotions),
        }
    }
}

impl Default for FormatMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.snapshot().fmt(f)
    }
}

/// Point-in-time copy of [`FormatMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatMetricsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub promotions: u64,
    pub duplicate_promotions: u64,
}
