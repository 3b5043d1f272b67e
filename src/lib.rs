//! # tracing-tags
//!
//! Hierarchical tag-based log filtering for the `tracing` ecosystem.
//!
//! Log sources are identified by dot-delimited tags such as
//! `"EduGo.Auth.Login"`. Minimum levels are configured per tag pattern, and
//! the most specific matching pattern decides the effective level of a tag.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tracing_tags::{Level, LoggerRegistry};
//! use tracing_subscriber::prelude::*;
//!
//! let registry = LoggerRegistry::builder()
//!     .with_directives("info,EduGo.Network.**=warn,EduGo.Auth.Login=debug")
//!     .build()
//!     .unwrap();
//!
//! // Apply the same rules to plain `tracing` events
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer().with_filter(registry.tracing_filter()))
//!     .init();
//!
//! let logger = registry.logger("EduGo.Auth.Login").unwrap();
//! logger.debug("shown: the exact rule wins over the default");
//!
//! let http = registry.logger("EduGo.Network.HTTP").unwrap();
//! http.info("dropped");
//!
//! tracing::info!(tag = "EduGo.Network.HTTP", "dropped as well");
//!
//! registry.config().set_level("EduGo.Network.**", Level::Debug).unwrap();
//! http.info("shown now");
//! ```
//!
//! ## Tags
//!
//! A tag is a non-empty sequence of segments separated by `.`. Segments are
//! non-empty and consist of ASCII letters, digits, `_` and `-`. The first
//! segment is the *module*, the second the *feature*, the last the
//! *component*.
//!
//! ```rust
//! use tracing_tags::Tag;
//!
//! let tag = Tag::parse("EduGo.Auth.Login").unwrap();
//! assert_eq!(tag.module(), "EduGo");
//! assert_eq!(tag.feature(), Some("Auth"));
//! assert_eq!(tag.component(), "Login");
//! assert_eq!(tag.depth(), 3);
//! assert!(Tag::parse("EduGo..Auth").is_err());
//! ```
//!
//! ## Patterns
//!
//! - **Literal**: `EduGo.Auth.Login` matches exactly that tag
//! - **`*`**: one whole segment, or part of one (`Auth*` matches `AuthV2`)
//! - **`**`**: zero or more whole segments
//! - **`regex:<expr>`**: `expr` must match the entire tag
//!
//! ```rust
//! use tracing_tags::LogFilter;
//!
//! let filter = LogFilter::new();
//! assert!(filter.matches("EduGo.Auth.Login", "EduGo.Auth.*"));
//! assert!(!filter.matches("EduGo.Auth.Login.OAuth", "EduGo.Auth.*"));
//! assert!(filter.matches("EduGo.Auth.Login.OAuth", "EduGo.Auth.**"));
//! assert!(filter.matches("EduGo.Auth", "regex:Edu[A-Za-z]+\\.Auth"));
//! ```
//!
//! Invalid patterns never match. They are reported once with a `warn` event
//! when first compiled.
//!
//! ## Level Resolution
//!
//! Among the rules whose pattern matches a tag, the longest pattern string
//! wins. Patterns of equal length are ranked lexicographically and the
//! smallest wins. Tags matched by no rule use the default level, which is
//! `Debug` unless configured otherwise.
//!
//! ## Pattern Cache
//!
//! Compiled patterns are kept in a bounded cache (100 entries by default).
//! When it is full, the oldest inserted pattern is evicted (FIFO). An LRU
//! policy is available through `LogFilter::builder().with_eviction_policy(...)`.
//!
//! ```rust
//! use std::sync::Arc;
//! use tracing_tags::{LogFilter, LruEviction};
//!
//! let filter = LogFilter::builder()
//!     .with_eviction_policy(Arc::new(LruEviction::new(500)))
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.cache_capacity(), 500);
//! ```
//!
//! ## Observability
//!
//! ```rust
//! use tracing_tags::LogFilter;
//!
//! let filter = LogFilter::new();
//! filter.matches("EduGo.Auth", "EduGo.*");
//! filter.matches("EduGo.Auth", "EduGo.*");
//!
//! let snapshot = filter.metrics().snapshot();
//! assert_eq!(snapshot.cache_misses, 1);
//! assert_eq!(snapshot.cache_hits, 1);
//! ```

/// Domain layer: tags, levels and patterns.
pub mod domain;

/// Application layer: filtering, level configuration and logger caching.
pub mod application;

/// Infrastructure layer: caches, storage, sinks and tracing integration.
pub mod infrastructure;

pub use domain::{
    level::{Level, LevelParseError},
    pattern::{PatternError, TagPattern, REGEX_PREFIX},
    tag::{Tag, TagError, SEPARATOR},
};

pub use domain::tag::{
    ancestors, build_child_tag, component, depth, feature, is_child_of, is_direct_child_of,
    is_valid, module, normalize, parent, relative_path, segments, validate,
};

pub use application::{
    cache::LoggerCache,
    config::{parse_directives, ConfigError, ConfigSnapshot, Directive, LoggerConfig},
    filter::{FilterBuildError, LogFilter, LogFilterBuilder},
    logger::TaggedLogger,
    metrics::{FilterMetrics, MetricsSnapshot},
    ports::{EvictionCandidate, EvictionPolicy, LogRecord, LogSink, Storage},
    registry::{LoggerRegistry, LoggerRegistryBuilder, RegistryBuildError},
};

pub use infrastructure::{
    eviction::{FifoEviction, LruEviction},
    layer::TagLevelFilter,
    pattern_cache::{PatternCache, DEFAULT_PATTERN_CACHE_CAPACITY},
    sink::{LevelFilteredSink, TracingSink},
    storage::ShardedStorage,
};
