//! Compile-or-lookup front end over the cache and miss counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use strfmt_core::CompiledFormat;

use crate::cache::FormatCache;
use crate::config::{CacheThreshold, env_threshold};
use crate::counters::UsageCounters;
use crate::metrics::{FormatMetrics, FormatMetricsSnapshot};

/// Function that turns a format string into its compiled form.
pub type Compiler = fn(&str) -> CompiledFormat;

/// Owns one cache, its miss counters and the promotion threshold.
#[derive(Debug)]
pub struct FormatRegistry {
    cache: FormatCache,
    counters: UsageCounters,
    threshold: AtomicUsize,
    metrics: FormatMetrics,
    compiler: Compiler,
}

impl FormatRegistry {
    #[must_use]
    pub fn new(threshold: CacheThreshold) -> Self {
        Self::with_compiler(threshold, strfmt_core::compile)
    }

    /// Registry that compiles with `compiler` instead of the default parser.
    #[must_use]
    pub fn with_compiler(threshold: CacheThreshold, compiler: Compiler) -> Self {
        Self {
            cache: FormatCache::new(),
            counters: UsageCounters::new(),
            threshold: AtomicUsize::new(threshold.get()),
            metrics: FormatMetrics::new(),
            compiler,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> CacheThreshold {
        CacheThreshold::new(self.threshold.load(Ordering::Relaxed))
    }

    /// Change the threshold. Affects promotion decisions from the next miss
    /// on; cached entries stay cached.
    pub fn set_threshold(&self, threshold: CacheThreshold) {
        let previous = self.threshold.swap(threshold.get(), Ordering::Relaxed);
        tracing::debug!(
            previous = %CacheThreshold::new(previous),
            current = %threshold,
            "format cache threshold changed"
        );
    }

    /// Return the compiled form of `format`, from the cache when present.
    ///
    /// On a miss the format is compiled and, depending on the threshold,
    /// promoted: always when the threshold is zero, otherwise once its miss
    /// count exceeds the threshold, never when disabled.
    pub fn lookup(&self, format: &str) -> Arc<CompiledFormat> {
        FormatMetrics::inc(&self.metrics.lookups);
        if let Some(compiled) = self.cache.get(format) {
            FormatMetrics::inc(&self.metrics.hits);
            return compiled;
        }
        FormatMetrics::inc(&self.metrics.misses);

        let threshold = self.threshold();
        let compiled = Arc::new((self.compiler)(format));
        if threshold.is_disabled() {
            return compiled;
        }

        let promote = threshold.is_always() || self.counters.bump(format) > threshold.get();
        if promote {
            if self.cache.insert(format, Arc::clone(&compiled)) {
                FormatMetrics::inc(&self.metrics.promotions);
                tracing::trace!(format, tokens = compiled.tokens().len(), "format promoted to cache");
            } else {
                FormatMetrics::inc(&self.metrics.duplicate_promotions);
                tracing::trace!(format, "format already cached by another thread");
            }
            if !threshold.is_always() {
                self.counters.remove(format);
            }
        }
        compiled
    }

    #[must_use]
    pub fn cache(&self) -> &FormatCache {
        &self.cache
    }

    #[must_use]
    pub fn counters(&self) -> &UsageCounters {
        &self.counters
    }

    #[must_use]
    pub fn metrics(&self) -> FormatMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Forget every cached format and miss count.
    #[cfg(any(test, feature = "test-util"))]
    pub fn purge(&self) {
        self.cache.clear();
        self.counters.clear();
        tracing::debug!("format cache purged");
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new(CacheThreshold::default())
    }
}

static GLOBAL_REGISTRY: LazyLock<FormatRegistry> = LazyLock::new(|| FormatRegistry::new(env_threshold()));

pub(crate) fn global_registry() -> &'static FormatRegistry {
    &GLOBAL_REGISTRY
}

/// Compiled form of `format` from the process-wide cache, compiling it on a
/// miss.
pub fn lookup(format: &str) -> Arc<CompiledFormat> {
    global_registry().lookup(format)
}

/// Set the global promotion threshold.
pub fn set_cache_threshold(threshold: CacheThreshold) {
    global_registry().set_threshold(threshold);
}

/// Current global promotion threshold.
#[must_use]
pub fn cache_threshold() -> CacheThreshold {
    global_registry().threshold()
}
