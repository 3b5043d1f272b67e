//! One logger instance per tag.
//!
//! The cache is unbounded: loggers are small and the set of tags in an
//! application is fixed by its source code.

use crate::application::logger::TaggedLogger;
use crate::application::ports::{LogSink, Storage};
use crate::domain::tag::{Tag, TagError};
use crate::infrastructure::storage::ShardedStorage;
use std::sync::Arc;

/// Default storage backing a `LoggerCache`.
pub type DefaultLoggerStorage = Arc<ShardedStorage<Tag, Arc<TaggedLogger>>>;

/// Identity cache of tagged loggers.
///
/// `get_or_create` for the same tag always returns the same `Arc`, even when
/// called concurrently. Removing or clearing entries does not invalidate
/// loggers already handed out.
#[derive(Debug, Clone)]
pub struct LoggerCache<S = DefaultLoggerStorage>
where
    S: Storage<Tag, Arc<TaggedLogger>> + Clone,
{
    storage: S,
}

impl LoggerCache<DefaultLoggerStorage> {
    /// Create an empty cache backed by sharded storage.
    pub fn new() -> Self {
        Self::with_storage(Arc::new(ShardedStorage::new()))
    }
}

impl Default for LoggerCache<DefaultLoggerStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> LoggerCache<S>
where
    S: Storage<Tag, Arc<TaggedLogger>> + Clone,
{
    /// Create a cache over a custom storage backend.
    pub fn with_storage(storage: S) -> Self {
        Self { storage }
    }

    /// Return the logger for `tag`, creating it with `sink` on first use.
    ///
    /// `sink` is ignored when the logger already exists.
    ///
    /// # Errors
    /// Returns `TagError` if `tag` is not a valid tag.
    pub fn get_or_create(
        &self,
        tag: &str,
        sink: Arc<dyn LogSink>,
    ) -> Result<Arc<TaggedLogger>, TagError> {
        if let Some(existing) = self.storage.get_cloned(tag) {
            return Ok(existing);
        }
        let tag = Tag::parse(tag)?;
        Ok(self.storage.with_entry_mut(
            tag.clone(),
            || Arc::new(TaggedLogger::from_tag(tag, sink)),
            |logger| Arc::clone(logger),
        ))
    }

    /// The cached logger for `tag`, if any.
    pub fn get(&self, tag: &str) -> Option<Arc<TaggedLogger>> {
        self.storage.get_cloned(tag)
    }

    /// Whether a logger for `tag` is cached.
    pub fn contains(&self, tag: &str) -> bool {
        self.storage.contains_key(tag)
    }

    /// Drop the cached logger for `tag` and return it.
    pub fn remove(&self, tag: &str) -> Option<Arc<TaggedLogger>> {
        self.storage.remove(tag)
    }

    /// Drops every cached logger.
    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Number of cached loggers.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True if no logger is cached.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// All cached tags, sorted.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags = Vec::with_capacity(self.storage.len());
        self.storage.for_each(|tag, _| tags.push(tag.clone()));
        tags.sort();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockSink;

    fn sink() -> Arc<dyn LogSink> {
        Arc::new(MockSink::new())
    }

    #[test]
    fn test_same_tag_same_instance() {
        let cache = LoggerCache::new();
        let a = cache.get_or_create("EduGo.Auth", sink()).unwrap();
        let b = cache.get_or_create("EduGo.Auth", sink()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_different_tags_distinct_instances() {
        let cache = LoggerCache::new();
        let a = cache.get_or_create("EduGo.Auth", sink()).unwrap();
        let b = cache.get_or_create("EduGo.Network", sink()).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalid_tag_not_cached() {
        let cache = LoggerCache::new();
        assert!(cache.get_or_create("EduGo..Auth", sink()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_introspection() {
        let cache = LoggerCache::new();
        cache.get_or_create("B.Two", sink()).unwrap();
        cache.get_or_create("A.One", sink()).unwrap();

        assert!(cache.contains("A.One"));
        assert!(!cache.contains("C"));
        assert!(cache.get("B.Two").is_some());
        assert!(cache.get("C").is_none());
        assert_eq!(
            cache.tags(),
            vec![Tag::parse("A.One").unwrap(), Tag::parse("B.Two").unwrap()]
        );
    }

    #[test]
    fn test_removed_logger_stays_usable() {
        let cache = LoggerCache::new();
        let mock = Arc::new(MockSink::new());
        let logger = cache.get_or_create("EduGo.Auth", mock.clone()).unwrap();

        let removed = cache.remove("EduGo.Auth").unwrap();
        assert!(Arc::ptr_eq(&logger, &removed));
        assert!(!cache.contains("EduGo.Auth"));

        logger.info("still works");
        assert_eq!(mock.count(), 1);

        let fresh = cache.get_or_create("EduGo.Auth", sink()).unwrap();
        assert!(!Arc::ptr_eq(&logger, &fresh));
        assert_eq!(*logger, *fresh);
    }

    #[test]
    fn test_clear() {
        let cache = LoggerCache::new();
        cache.get_or_create("A", sink()).unwrap();
        cache.get_or_create("B", sink()).unwrap();

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.tags().is_empty());
    }

    #[test]
    fn test_concurrent_get_or_create() {
        use std::thread;

        let cache = LoggerCache::new();
        let handles: Vec<_> = (0..100)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || cache.get_or_create("X", sink()).unwrap())
            })
            .collect();

        let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(cache.len(), 1);
        assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
    }
}
