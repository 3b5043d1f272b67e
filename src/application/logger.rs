//! Loggers bound to a hierarchical tag.

use crate::application::ports::{LogRecord, LogSink};
use crate::domain::level::Level;
use crate::domain::tag::{Tag, TagError};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An immutable pairing of a validated tag and a sink.
///
/// Equality and hashing consider the tag only. Identity of cached loggers is
/// provided by `LoggerCache`, which hands out shared `Arc`s.
#[derive(Clone)]
pub struct TaggedLogger {
    tag: Tag,
    sink: Arc<dyn LogSink>,
}

impl TaggedLogger {
    /// Create a logger for `tag`.
    ///
    /// # Errors
    /// Returns `TagError` if `tag` is not a valid tag.
    pub fn new(tag: &str, sink: Arc<dyn LogSink>) -> Result<Self, TagError> {
        Ok(Self::from_tag(Tag::parse(tag)?, sink))
    }

    /// Create a logger for an already validated tag.
    pub fn from_tag(tag: Tag, sink: Arc<dyn LogSink>) -> Self {
        Self { tag, sink }
    }

    /// Tag this logger writes under.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Sink receiving the records.
    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Logger for `tag.segment`, sharing this logger's sink.
    ///
    /// # Errors
    /// Returns `TagError::NestedSegment` if `segment` contains a dot, or
    /// another `TagError` if it is otherwise invalid.
    pub fn with_child(&self, segment: &str) -> Result<TaggedLogger, TagError> {
        Ok(Self::from_tag(self.tag.child(segment)?, Arc::clone(&self.sink)))
    }

    /// Whether the sink would emit a message at `level`.
    pub fn is_enabled(&self, level: Level) -> bool {
        self.sink.is_enabled(&self.tag, level)
    }

    /// Emit `message` at `level` if enabled.
    pub fn log(&self, level: Level, message: &str) {
        self.emit(level, message, None);
    }

    /// Emit at `Debug`.
    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message, None);
    }

    /// Emit at `Info`.
    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message, None);
    }

    /// Emit at `Warning`.
    pub fn warn(&self, message: &str) {
        self.emit(Level::Warning, message, None);
    }

    /// Emit at `Error`.
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message, None);
    }

    /// Emit an error-level message carrying `error`.
    pub fn error_with(&self, message: &str, error: &(dyn std::error::Error + 'static)) {
        self.emit(Level::Error, message, Some(error));
    }

    fn emit(
        &self,
        level: Level,
        message: &str,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        if !self.sink.is_enabled(&self.tag, level) {
            return;
        }
        self.sink.log(&LogRecord {
            tag: &self.tag,
            level,
            message,
            error,
        });
    }
}

impl fmt::Debug for TaggedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedLogger")
            .field("tag", &self.tag)
            .field("sink", &self.sink)
            .finish()
    }
}

impl PartialEq for TaggedLogger {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for TaggedLogger {}

impl Hash for TaggedLogger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockSink;
    use std::collections::HashSet;

    #[test]
    fn test_rejects_invalid_tag() {
        let sink = Arc::new(MockSink::new());
        assert_eq!(
            TaggedLogger::new("", sink.clone()).unwrap_err(),
            TagError::Blank
        );
        assert!(TaggedLogger::new("EduGo..Auth", sink.clone()).is_err());
        assert!(TaggedLogger::new("EduGo.", sink).is_err());
    }

    #[test]
    fn test_with_child() {
        let sink = Arc::new(MockSink::new());
        let logger = TaggedLogger::new("EduGo.Auth", sink).unwrap();

        let child = logger.with_child("Login").unwrap();
        assert_eq!(child.tag().as_str(), "EduGo.Auth.Login");
        assert!(Arc::ptr_eq(child.sink(), logger.sink()));

        assert!(matches!(
            logger.with_child("Login.OAuth"),
            Err(TagError::NestedSegment { .. })
        ));
        assert!(logger.with_child("").is_err());
    }

    #[test]
    fn test_equality_is_tag_based() {
        let a = TaggedLogger::new("EduGo.Auth", Arc::new(MockSink::new())).unwrap();
        let b = TaggedLogger::new("EduGo.Auth", Arc::new(MockSink::new())).unwrap();
        let c = TaggedLogger::new("EduGo.Network", Arc::new(MockSink::new())).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_forwards_to_sink() {
        let sink = Arc::new(MockSink::new());
        let logger = TaggedLogger::new("EduGo.Auth", sink.clone()).unwrap();

        logger.info("signed in");
        logger.error_with("failed", &std::fmt::Error);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tag, "EduGo.Auth");
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[0].message, "signed in");
        assert_eq!(records[1].level, Level::Error);
        assert!(records[1].error.is_some());
    }

    #[test]
    fn test_respects_sink_threshold() {
        let sink = Arc::new(MockSink::with_min_level(Level::Warning));
        let logger = TaggedLogger::new("EduGo.Auth", sink.clone()).unwrap();

        logger.debug("hidden");
        logger.info("hidden");
        logger.warn("shown");

        assert!(!logger.is_enabled(Level::Info));
        assert_eq!(sink.count(), 1);
    }
}
