//! Tag-against-pattern matching.
//!
//! `LogFilter` owns the bounded pattern cache. Matching never fails: a
//! pattern that does not compile simply matches nothing, because pattern
//! strings usually come from configuration and logging must keep working.

use crate::application::metrics::FilterMetrics;
use crate::application::ports::EvictionPolicy;
use crate::infrastructure::eviction::FifoEviction;
use crate::infrastructure::pattern_cache::{
    CompiledPattern, PatternCache, DEFAULT_PATTERN_CACHE_CAPACITY,
};
use std::fmt;
use std::sync::Arc;

/// Error returned when building a `LogFilter` fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBuildError {
    /// Cache capacity must be greater than zero
    ZeroCapacity,
}

impl fmt::Display for FilterBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterBuildError::ZeroCapacity => {
                write!(f, "pattern cache capacity must be greater than 0")
            }
        }
    }
}

impl std::error::Error for FilterBuildError {}

/// Builder for constructing a `LogFilter`.
#[derive(Debug)]
pub struct LogFilterBuilder {
    capacity: usize,
    eviction_policy: Option<Arc<dyn EvictionPolicy<String>>>,
    metrics: Option<FilterMetrics>,
}

impl LogFilterBuilder {
    /// Set the number of compiled patterns kept (FIFO eviction).
    ///
    /// Ignored when a custom eviction policy is set.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Use a custom eviction policy, e.g. `LruEviction`.
    pub fn with_eviction_policy(mut self, policy: Arc<dyn EvictionPolicy<String>>) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    /// Share a metrics tracker with other components.
    pub fn with_metrics(mut self, metrics: FilterMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the filter.
    ///
    /// # Errors
    /// Returns `FilterBuildError::ZeroCapacity` if the effective capacity is zero.
    pub fn build(self) -> Result<LogFilter, FilterBuildError> {
        let policy = match self.eviction_policy {
            Some(policy) => policy,
            None => Arc::new(FifoEviction::new(self.capacity)),
        };
        if policy.capacity() == 0 {
            return Err(FilterBuildError::ZeroCapacity);
        }

        let mut cache = PatternCache::with_policy(policy);
        if let Some(metrics) = self.metrics {
            cache = cache.with_metrics(metrics);
        }

        Ok(LogFilter { cache })
    }
}

/// Matches tags against literal, wildcard and `regex:` patterns.
#[derive(Debug, Default)]
pub struct LogFilter {
    cache: PatternCache,
}

impl LogFilter {
    /// Create a filter with a FIFO cache of `DEFAULT_PATTERN_CACHE_CAPACITY` patterns.
    pub fn new() -> Self {
        Self {
            cache: PatternCache::new(),
        }
    }

    /// Create a builder for configuring the filter.
    ///
    /// Defaults:
    /// - Capacity: 100 compiled patterns
    /// - Eviction: FIFO
    pub fn builder() -> LogFilterBuilder {
        LogFilterBuilder {
            capacity: DEFAULT_PATTERN_CACHE_CAPACITY,
            eviction_policy: None,
            metrics: None,
        }
    }

    /// Check whether `tag` matches `pattern`.
    ///
    /// A blank tag or an empty pattern never matches, and neither does a
    /// pattern that fails to compile.
    pub fn matches(&self, tag: &str, pattern: &str) -> bool {
        if tag.trim().is_empty() || pattern.is_empty() {
            return false;
        }
        match self.cache.get_or_compile(pattern).as_ref() {
            Ok(compiled) => compiled.matches(tag),
            Err(_) => false,
        }
    }

    /// Check whether `tag` matches any of `patterns`.
    pub fn matches_any<I, P>(&self, tag: &str, patterns: I) -> bool
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        if tag.trim().is_empty() {
            return false;
        }
        patterns
            .into_iter()
            .any(|pattern| self.matches(tag, pattern.as_ref()))
    }

    /// Tags matching `pattern`, in their original order.
    pub fn filter<'a, I>(&self, tags: I, pattern: &str) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tags.into_iter()
            .filter(|tag| self.matches(tag, pattern))
            .collect()
    }

    /// Compile `pattern` through the cache and keep the result.
    ///
    /// The returned value stays valid after the cache evicts the pattern;
    /// `LoggerConfig` stores it next to each rule.
    pub fn compile(&self, pattern: &str) -> Arc<CompiledPattern> {
        self.cache.get_or_compile(pattern)
    }

    /// Check whether `pattern` compiles.
    pub fn is_valid_pattern(&self, pattern: &str) -> bool {
        !pattern.is_empty() && self.cache.get_or_compile(pattern).is_ok()
    }

    /// Number of cached compiled patterns.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached compiled pattern.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Whether `pattern` is currently cached.
    pub fn is_cached(&self, pattern: &str) -> bool {
        self.cache.contains(pattern)
    }

    /// Maximum number of cached patterns.
    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Cache hit/miss/eviction counters.
    pub fn metrics(&self) -> &FilterMetrics {
        self.cache.metrics()
    }
}
