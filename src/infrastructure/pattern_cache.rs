//! Bounded cache of compiled patterns.
//!
//! Entries are keyed by the raw pattern string and carry the sequence
//! numbers the eviction policy ranks them by. Failed compilations are cached
//! as well, so a bad pattern coming from configuration is reported once.

use crate::application::metrics::FilterMetrics;
use crate::application::ports::{EvictionCandidate, EvictionPolicy};
use crate::domain::pattern::{PatternError, TagPattern};
use crate::infrastructure::eviction::FifoEviction;
use ahash::AHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default number of compiled patterns kept.
pub const DEFAULT_PATTERN_CACHE_CAPACITY: usize = 100;

/// Outcome of compiling a pattern string.
pub type CompiledPattern = Result<TagPattern, PatternError>;

#[derive(Debug)]
struct CacheEntry {
    compiled: Arc<CompiledPattern>,
    inserted: u64,
    last_access: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: AHashMap<String, CacheEntry>,
    next_seq: u64,
}

impl CacheInner {
    fn tick(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Thread-safe bounded pattern cache.
///
/// A single mutex protects the map. Compilation runs outside the lock and the
/// result is inserted only if no other caller stored one first, so concurrent
/// compiles of the same pattern converge to one entry.
#[derive(Debug)]
pub struct PatternCache {
    inner: Mutex<CacheInner>,
    policy: Arc<dyn EvictionPolicy<String>>,
    metrics: FilterMetrics,
}

impl PatternCache {
    /// Create a FIFO cache with the default capacity.
    pub fn new() -> Self {
        Self::with_policy(Arc::new(FifoEviction::new(DEFAULT_PATTERN_CACHE_CAPACITY)))
    }

    /// Create a cache with a custom eviction policy.
    pub fn with_policy(policy: Arc<dyn EvictionPolicy<String>>) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            policy,
            metrics: FilterMetrics::new(),
        }
    }

    /// Share an existing metrics tracker.
    pub fn with_metrics(mut self, metrics: FilterMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the compiled form of `pattern`, compiling it on a miss.
    pub fn get_or_compile(&self, pattern: &str) -> Arc<CompiledPattern> {
        if let Some(hit) = self.lookup(pattern) {
            self.metrics.record_hit();
            return hit;
        }
        self.metrics.record_miss();

        let compiled = Arc::new(TagPattern::parse(pattern));
        let (stored, inserted, evicted) = self.insert_if_absent(pattern, compiled);

        for victim in &evicted {
            tracing::trace!(pattern = %victim, "evicted compiled pattern");
        }
        if inserted {
            if let Err(error) = stored.as_ref() {
                tracing::warn!(pattern, %error, "pattern will never match");
            }
        }

        stored
    }

    fn lookup(&self, pattern: &str) -> Option<Arc<CompiledPattern>> {
        let mut inner = self.lock();
        let seq = inner.tick();
        inner.entries.get_mut(pattern).map(|entry| {
            entry.last_access = seq;
            Arc::clone(&entry.compiled)
        })
    }

    fn insert_if_absent(
        &self,
        pattern: &str,
        compiled: Arc<CompiledPattern>,
    ) -> (Arc<CompiledPattern>, bool, Vec<String>) {
        let mut inner = self.lock();

        if let Some(existing) = inner.entries.get(pattern) {
            return (Arc::clone(&existing.compiled), false, Vec::new());
        }

        let mut evicted = Vec::new();
        while !inner.entries.is_empty() && self.policy.should_evict(inner.entries.len()) {
            let candidates: Vec<EvictionCandidate<String>> = inner
                .entries
                .iter()
                .map(|(key, entry)| EvictionCandidate {
                    key: key.clone(),
                    inserted: entry.inserted,
                    last_access: entry.last_access,
                })
                .collect();

            match self.policy.select_victim(&candidates) {
                Some(victim) => {
                    inner.entries.remove(&victim);
                    self.metrics.record_eviction();
                    evicted.push(victim);
                }
                None => break,
            }
        }

        let seq = inner.tick();
        inner.entries.insert(
            pattern.to_string(),
            CacheEntry {
                compiled: Arc::clone(&compiled),
                inserted: seq,
                last_access: seq,
            },
        );

        (compiled, true, evicted)
    }

    /// Check whether a pattern is cached without touching its access order.
    pub fn contains(&self, pattern: &str) -> bool {
        self.lock().entries.contains_key(pattern)
    }

    /// Cached pattern strings, oldest inserted first.
    pub fn patterns(&self) -> Vec<String> {
        let inner = self.lock();
        let mut keyed: Vec<(u64, &String)> = inner
            .entries
            .iter()
            .map(|(key, entry)| (entry.inserted, key))
            .collect();
        keyed.sort_unstable_by_key(|(inserted, _)| *inserted);
        keyed.into_iter().map(|(_, key)| key.clone()).collect()
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Remove every cached pattern.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Maximum number of cached patterns.
    pub fn capacity(&self) -> usize {
        self.policy.capacity()
    }

    /// Hit, miss and eviction counters.
    pub fn metrics(&self) -> &FilterMetrics {
        &self.metrics
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}
