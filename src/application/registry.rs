//! Explicit wiring of the filter, level configuration, logger cache and sink.
//!
//! A `LoggerRegistry` replaces process-wide singletons: every component is
//! owned by the registry and shared through `Arc`, so tests can build as
//! many independent registries as they need.
//!
//! ```
//! use tracing_tags::{Level, LoggerRegistry};
//!
//! let registry = LoggerRegistry::builder()
//!     .with_directives("EduGo.Auth.*=warn")
//!     .build()
//!     .unwrap();
//!
//! let logger = registry.logger("EduGo.Auth.Login").unwrap();
//! assert!(!logger.is_enabled(Level::Info));
//! assert!(logger.is_enabled(Level::Warning));
//! logger.warn("emitted as a tracing event");
//! ```

use crate::application::cache::LoggerCache;
use crate::application::config::{ConfigError, LoggerConfig};
use crate::application::filter::{FilterBuildError, LogFilter};
use crate::application::logger::TaggedLogger;
use crate::application::metrics::FilterMetrics;
use crate::application::ports::LogSink;
use crate::domain::level::Level;
use crate::domain::tag::TagError;
use crate::infrastructure::layer::TagLevelFilter;
use crate::infrastructure::pattern_cache::DEFAULT_PATTERN_CACHE_CAPACITY;
use crate::infrastructure::sink::{LevelFilteredSink, TracingSink};
use std::fmt;
use std::sync::Arc;

/// Error returned when building a `LoggerRegistry` fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryBuildError {
    /// The pattern filter could not be built
    Filter(FilterBuildError),
    /// The level configuration could not be built
    Config(ConfigError),
}

impl fmt::Display for RegistryBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryBuildError::Filter(e) => write!(f, "invalid filter: {}", e),
            RegistryBuildError::Config(e) => write!(f, "invalid level configuration: {}", e),
        }
    }
}

impl std::error::Error for RegistryBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryBuildError::Filter(e) => Some(e),
            RegistryBuildError::Config(e) => Some(e),
        }
    }
}

impl From<FilterBuildError> for RegistryBuildError {
    fn from(e: FilterBuildError) -> Self {
        RegistryBuildError::Filter(e)
    }
}

impl From<ConfigError> for RegistryBuildError {
    fn from(e: ConfigError) -> Self {
        RegistryBuildError::Config(e)
    }
}

/// Builder for constructing a `LoggerRegistry`.
#[derive(Debug)]
pub struct LoggerRegistryBuilder {
    sink: Option<Arc<dyn LogSink>>,
    config: Option<Arc<LoggerConfig>>,
    default_level: Level,
    directives: Vec<String>,
    pattern_cache_capacity: usize,
    metrics: Option<FilterMetrics>,
}

impl LoggerRegistryBuilder {
    /// Sink receiving records that pass the level rules.
    ///
    /// Default: `TracingSink`.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Use an existing config instead of building one.
    ///
    /// The config's own filter is used, and the default level, directive and
    /// capacity settings of this builder are ignored.
    pub fn with_config(mut self, config: Arc<LoggerConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Level for tags no rule matches.
    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Add rules from a directive string such as `"info,EduGo.Network.**=warn"`.
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives.push(directives.into());
        self
    }

    /// Number of compiled patterns kept by the filter.
    pub fn with_pattern_cache_capacity(mut self, capacity: usize) -> Self {
        self.pattern_cache_capacity = capacity;
        self
    }

    /// Share metrics with another filter or registry.
    pub fn with_metrics(mut self, metrics: FilterMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the registry.
    ///
    /// # Errors
    /// Returns `RegistryBuildError` if the pattern cache capacity is zero or
    /// a directive is malformed.
    pub fn build(self) -> Result<LoggerRegistry, RegistryBuildError> {
        let config = match self.config {
            Some(config) => config,
            None => {
                let mut filter = LogFilter::builder().with_capacity(self.pattern_cache_capacity);
                if let Some(metrics) = self.metrics {
                    filter = filter.with_metrics(metrics);
                }
                let mut config = LoggerConfig::builder()
                    .with_filter(Arc::new(filter.build()?))
                    .with_default_level(self.default_level);
                for directives in self.directives {
                    config = config.with_directives(directives);
                }
                Arc::new(config.build()?)
            }
        };
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink::new()));

        Ok(LoggerRegistry {
            filtered_sink: Arc::new(LevelFilteredSink::new(Arc::clone(&config), sink)),
            config,
            cache: LoggerCache::new(),
        })
    }
}

/// Owns one filter, one level configuration and one logger cache.
///
/// Cloning is cheap and clones share all state.
#[derive(Debug, Clone)]
pub struct LoggerRegistry {
    config: Arc<LoggerConfig>,
    cache: LoggerCache,
    filtered_sink: Arc<dyn LogSink>,
}

impl LoggerRegistry {
    /// Create a registry with default settings, emitting through `TracingSink`.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink::new()))
    }

    /// Create a registry with default settings, emitting to `sink`.
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        let config = Arc::new(LoggerConfig::new());
        Self {
            filtered_sink: Arc::new(LevelFilteredSink::new(Arc::clone(&config), sink)),
            config,
            cache: LoggerCache::new(),
        }
    }

    /// Create a builder for configuring the registry.
    ///
    /// Defaults:
    /// - Sink: `TracingSink`
    /// - Default level: `Debug`
    /// - Pattern cache: 100 patterns, FIFO eviction
    pub fn builder() -> LoggerRegistryBuilder {
        LoggerRegistryBuilder {
            sink: None,
            config: None,
            default_level: Level::default(),
            directives: Vec::new(),
            pattern_cache_capacity: DEFAULT_PATTERN_CACHE_CAPACITY,
            metrics: None,
        }
    }

    /// The cached logger for `tag`, created on first use.
    ///
    /// Its sink drops records below the level configured for `tag`.
    ///
    /// # Errors
    /// Returns `TagError` if `tag` is not a valid tag.
    pub fn logger(&self, tag: &str) -> Result<Arc<TaggedLogger>, TagError> {
        self.cache.get_or_create(tag, Arc::clone(&self.filtered_sink))
    }

    /// Whether a message at `level` for `tag` passes the level rules.
    pub fn is_enabled(&self, tag: &str, level: Level) -> bool {
        self.config.is_enabled(tag, level)
    }

    /// Effective minimum level for `tag`.
    pub fn level_for(&self, tag: &str) -> Level {
        self.config.level_for(tag)
    }

    /// Rule table shared by every logger of this registry.
    pub fn config(&self) -> &Arc<LoggerConfig> {
        &self.config
    }

    /// Pattern matcher backing the rule table.
    pub fn filter(&self) -> &Arc<LogFilter> {
        self.config.filter()
    }

    /// Loggers handed out so far.
    pub fn cache(&self) -> &LoggerCache {
        &self.cache
    }

    /// A `tracing_subscriber` filter sharing this registry's level rules.
    pub fn tracing_filter(&self) -> TagLevelFilter {
        TagLevelFilter::new(Arc::clone(&self.config))
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
