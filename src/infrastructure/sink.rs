//! Sink adapters.

use crate::application::config::LoggerConfig;
use crate::application::ports::{LogRecord, LogSink};
use crate::domain::level::Level;
use crate::domain::tag::Tag;
use std::sync::Arc;

/// Target used for events emitted by `TracingSink`.
pub const TRACING_TARGET: &str = "tracing_tags";

/// Sink emitting records as `tracing` events.
///
/// Every event carries a `tag` field, which `TagLevelFilter` reads to apply
/// the rule table downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a sink emitting to the current `tracing` dispatcher.
    pub fn new() -> Self {
        Self
    }
}

macro_rules! emit_at {
    ($macro:ident, $tag:ident, $message:ident, $error:ident) => {
        match $error {
            Some(error) => tracing::$macro!(
                target: TRACING_TARGET,
                tag = %$tag,
                error = %error,
                "{}",
                $message
            ),
            None => tracing::$macro!(target: TRACING_TARGET, tag = %$tag, "{}", $message),
        }
    };
}

impl LogSink for TracingSink {
    fn log(&self, record: &LogRecord<'_>) {
        let LogRecord {
            tag,
            level,
            message,
            error,
        } = *record;
        match level {
            Level::Debug => emit_at!(debug, tag, message, error),
            Level::Info => emit_at!(info, tag, message, error),
            Level::Warning => emit_at!(warn, tag, message, error),
            Level::Error => emit_at!(error, tag, message, error),
        }
    }
}

/// Sink decorator that drops records below the configured level for their tag.
///
/// The level check lives in `is_enabled`. `log` forwards unconditionally, so
/// callers writing to this sink directly must gate on `is_enabled` first, as
/// `TaggedLogger` does.
#[derive(Debug, Clone)]
pub struct LevelFilteredSink {
    config: Arc<LoggerConfig>,
    inner: Arc<dyn LogSink>,
}

impl LevelFilteredSink {
    /// Wraps `inner`, consulting `config` for every tag and level.
    pub fn new(config: Arc<LoggerConfig>, inner: Arc<dyn LogSink>) -> Self {
        Self { config, inner }
    }

    /// The rule table this sink consults.
    pub fn config(&self) -> &Arc<LoggerConfig> {
        &self.config
    }
}

impl LogSink for LevelFilteredSink {
    fn is_enabled(&self, tag: &Tag, level: Level) -> bool {
        self.config.is_enabled(tag.as_str(), level) && self.inner.is_enabled(tag, level)
    }

    fn log(&self, record: &LogRecord<'_>) {
        self.inner.log(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::logger::TaggedLogger;
    use crate::infrastructure::mocks::{MockCaptureLayer, MockSink};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_level_filtered_sink() {
        let config = Arc::new(LoggerConfig::new());
        config.set_level("EduGo.Auth.*", Level::Warning).unwrap();
        let mock = Arc::new(MockSink::new());
        let sink = Arc::new(LevelFilteredSink::new(config, mock.clone()));

        let login = TaggedLogger::new("EduGo.Auth.Login", sink.clone()).unwrap();
        let http = TaggedLogger::new("EduGo.Network.HTTP", sink).unwrap();

        login.info("dropped");
        login.warn("kept");
        http.debug("kept");

        let messages: Vec<_> = mock.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["kept", "kept"]);
    }

    #[test]
    fn test_log_trusts_enabled_gate() {
        let config = Arc::new(LoggerConfig::new());
        config.set_level("EduGo.Auth", Level::Error).unwrap();
        let mock = Arc::new(MockSink::new());
        let sink = LevelFilteredSink::new(Arc::clone(&config), mock.clone());
        let tag = Tag::parse("EduGo.Auth").unwrap();

        assert!(!sink.is_enabled(&tag, Level::Info));
        sink.log(&LogRecord {
            tag: &tag,
            level: Level::Info,
            message: "forwarded",
            error: None,
        });
        assert_eq!(mock.count(), 1);

        let logger = TaggedLogger::new("EduGo.Auth", Arc::new(sink)).unwrap();
        logger.info("dropped");
        logger.error("kept");

        let messages: Vec<_> = mock.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["forwarded", "kept"]);
    }

    #[test]
    fn test_tracing_sink_emits_tag_field() {
        let capture = MockCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            let logger = TaggedLogger::new("EduGo.Auth", Arc::new(TracingSink::new())).unwrap();
            logger.warn("token expired");
            logger.error_with("refresh failed", &std::fmt::Error);
        });

        let captured = capture.get_captured();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].level, tracing::Level::WARN);
        assert_eq!(captured[0].tag.as_deref(), Some("EduGo.Auth"));
        assert_eq!(captured[0].message, "token expired");
        assert_eq!(captured[0].target, TRACING_TARGET);
        assert_eq!(captured[1].level, tracing::Level::ERROR);
    }
}
