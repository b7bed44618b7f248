//! Embedding cache and Pattern Engine metrics.
//!
//! The cache is a process-wide map keyed by input text, backed by a
//! mutex-guarded LRU (`lru` crate). See DESIGN.md for why a mutex
//! rather than a lock-free structure is used here.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

/// LRU cache of `text -> embedding`, shared across `recognize`/`learn`/
/// `suggest` calls.
pub struct EmbeddingCache {
    inner: Mutex<LruCache<String, Vec<f32>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a cached embedding for `text`, recording a hit or miss.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let mut guard = self.inner.lock();
        match guard.get(text) {
            Some(vector) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(vector.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, text: String, embedding: Vec<f32>) {
        self.inner.lock().put(text, embedding);
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Pattern Engine metrics: counters plus derived hit rate.
#[derive(Debug, Default)]
pub struct PatternMetrics {
    pub patterns_detected: AtomicU64,
    pub patterns_learned: AtomicU64,
    pub ai_calls: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub processing_time_micros: AtomicU64,
}

impl PatternMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_detected(&self, count: u64) {
        self.patterns_detected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_learned(&self, count: u64) {
        self.patterns_learned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_ai_call(&self) {
        self.ai_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_processing_time(&self, micros: u64) {
        self.processing_time_micros
            .fetch_add(micros, Ordering::Relaxed);
    }

    pub fn sync_cache_counters(&self, cache: &EmbeddingCache) {
        self.cache_hits.store(cache.hits(), Ordering::Relaxed);
        self.cache_misses.store(cache.misses(), Ordering::Relaxed);
    }

    /// Derived cache hit rate in `[0, 1]`.
    #[must_use]
    pub fn hit_rate(&self) -> f32 {
        let hits = self.cache_hits.load(Ordering::Relaxed) as f32;
        let misses = self.cache_misses.load(Ordering::Relaxed) as f32;
        if hits + misses == 0.0 {
            0.0
        } else {
            hits / (hits + misses)
        }
    }
}
