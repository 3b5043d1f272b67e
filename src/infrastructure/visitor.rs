//! Field visitor extracting the `tag` field from events.
//!
//! `TracingSink` records the tag with `%` formatting, which reaches the
//! visitor through `record_debug`. Callers using `tracing` directly usually
//! pass a string literal, which arrives through `record_str`.

use std::fmt;
use tracing::field::{Field, Visit};

/// Name of the event field holding the tag.
pub const TAG_FIELD: &str = "tag";

/// A visitor that captures the value of the `tag` field, if present.
#[derive(Debug, Default)]
pub(crate) struct TagVisitor {
    tag: Option<String>,
}

impl TagVisitor {
    /// Visitor with no tag recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the visitor and return the captured tag.
    pub fn into_tag(self) -> Option<String> {
        self.tag
    }
}

impl Visit for TagVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == TAG_FIELD {
            self.tag = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == TAG_FIELD {
            self.tag = Some(format!("{:?}", value));
        }
    }
}
