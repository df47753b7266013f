//! # strfmt-runtime
//!
//! Process-wide compile-or-lookup for format strings. Compiled formats are
//! kept in a copy-on-write cache; how eagerly a format is promoted into the
//! cache is governed by a [`CacheThreshold`].
//!
//! The process-wide cache itself is not reachable from outside this crate;
//! only [`lookup`] and the threshold accessors touch it:
//!
//! ```compile_fail
//! strfmt_runtime::global_registry().purge();
//! ```

#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod counters;
pub mod metrics;
pub mod registry;

pub use cache::FormatCache;
pub use config::{CacheThreshold, THRESHOLD_ENV, env_threshold};
pub use counters::UsageCounters;
pub use metrics::{FormatMetrics, FormatMetricsSnapshot};
pub use registry::{Compiler, FormatRegistry, cache_threshold, lookup, set_cache_threshold};

/// Hooks for tests that observe or reset the process-wide cache.
#[cfg(feature = "test-util")]
pub mod test_util {
    use crate::registry::{FormatRegistry, global_registry};

    /// The registry behind [`lookup`](crate::lookup).
    #[must_use]
    pub fn registry() -> &'static FormatRegistry {
        global_registry()
    }

    /// Empty the process-wide cache and miss counters.
    pub fn reset() {
        global_registry().purge();
    }
}
