//! Recording sink for testing.

use crate::application::ports::{LogRecord, LogSink};
use crate::domain::level::Level;
use crate::domain::tag::Tag;
use std::sync::Mutex;

/// A log record copied out of a `LogRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RecordedLog {
    pub tag: String,
    pub level: Level,
    pub message: String,
    pub error: Option<String>,
}

/// Sink that stores every record it receives.
#[derive(Debug, Default)]
pub struct MockSink {
    min_level: Level,
    records: Mutex<Vec<RecordedLog>>,
}

impl MockSink {
    /// Create a sink accepting every level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that reports levels below `min_level` as disabled.
    pub fn with_min_level(min_level: Level) -> Self {
        Self {
            min_level,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Get all recorded logs, oldest first.
    pub fn records(&self) -> Vec<RecordedLog> {
        self.records
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Get the count of recorded logs.
    pub fn count(&self) -> usize {
        self.records
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }

    /// Clear all recorded logs.
    pub fn clear(&self) {
        self.records
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .clear();
    }
}

impl LogSink for MockSink {
    fn is_enabled(&self, _tag: &Tag, level: Level) -> bool {
        level >= self.min_level
    }

    fn log(&self, record: &LogRecord<'_>) {
        self.records
            .lock()
            .expect("MockSink mutex poisoned - a test thread panicked while holding the lock")
            .push(RecordedLog {
                tag: record.tag.to_string(),
                level: record.level,
                message: record.message.to_string(),
                error: record.error.map(|e| e.to_string()),
            });
    }
}
