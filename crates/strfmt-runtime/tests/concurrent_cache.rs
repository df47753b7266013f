//! Many threads inserting and looking up formats at once.

use std::sync::{Arc, Barrier};
use std::thread;

use strfmt_core::compile;
use strfmt_runtime::{CacheThreshold, FormatCache, FormatRegistry};

#[test]
fn concurrent_inserts_all_land() {
    const THREADS: usize = 10;
    let sources: Vec<String> = (0..THREADS).map(|i| format!("source value: #{i}")).collect();
    let cache = FormatCache::new();
    let start = Barrier::new(THREADS);

    thread::scope(|s| {
        for source in &sources {
            let (cache, start) = (&cache, &start);
            s.spawn(move || {
                let compiled = Arc::new(compile(source));
                start.wait();
                assert!(cache.insert(source, compiled));
            });
        }
    });

    assert_eq!(cache.len(), THREADS);
    for source in &sources {
        let hit = cache.get(source).expect("entry present");
        assert_eq!(hit.as_literal(), Some(source.as_str()));
        assert_eq!(hit.required_args(), 0);
    }
}

#[test]
fn racing_promotions_keep_one_entry() {
    const THREADS: usize = 8;
    let registry = FormatRegistry::new(CacheThreshold::ALWAYS);
    let start = Barrier::new(THREADS);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let (registry, start) = (&registry, &start);
                s.spawn(move || {
                    start.wait();
                    registry.lookup("%s and %q")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("worker panicked")).collect()
    });

    assert_eq!(registry.cache().len(), 1);
    let cached = registry.cache().get("%s and %q").expect("promoted");
    for compiled in &results {
        assert_eq!(**compiled, *cached);
    }
    let m = registry.metrics();
    assert_eq!(m.lookups, THREADS as u64);
    assert_eq!(m.hits + m.misses, THREADS as u64);
    assert_eq!(m.promotions, 1);
    assert_eq!(m.duplicate_promotions, m.misses - 1);
}

#[test]
fn readers_never_block_on_writers() {
    let registry = FormatRegistry::new(CacheThreshold::ALWAYS);
    let formats: Vec<String> = (0..200).map(|i| format!("%s #{i}")).collect();

    thread::scope(|s| {
        for chunk in formats.chunks(50) {
            let registry = &registry;
            s.spawn(move || {
                for format in chunk {
                    let compiled = registry.lookup(format);
                    assert_eq!(compiled.required_args(), 1);
                }
            });
        }
        s.spawn(|| {
            for _ in 0..1000 {
                let _ = registry.cache().get("%s #0");
            }
        });
    });

    assert_eq!(registry.cache().len(), formats.len());
}
