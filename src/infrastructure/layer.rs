//! Tracing integration.
//!
//! Provides a `tracing_subscriber` per-layer `Filter` that applies the tag
//! level rules of a `LoggerConfig` to events.
//!
//! The tag of an event is its `tag` field. Events without one are tagged by
//! their target, with `::` replaced by `.`, so `my_app::auth` is filtered as
//! `my_app.auth`.

use crate::application::config::LoggerConfig;
use crate::domain::level::Level;
use crate::infrastructure::visitor::TagVisitor;

use std::borrow::Cow;
use std::sync::Arc;
use tracing::{Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Filter};

/// Per-layer filter driven by tag level rules.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tracing_subscriber::prelude::*;
/// use tracing_tags::{Level, LoggerConfig, TagLevelFilter};
///
/// let config = Arc::new(LoggerConfig::new());
/// config.set_level("EduGo.Network.**", Level::Warning).unwrap();
///
/// tracing_subscriber::registry()
///     .with(tracing_subscriber::fmt::layer().with_filter(TagLevelFilter::new(config)))
///     .init();
/// ```
#[derive(Debug, Clone)]
pub struct TagLevelFilter {
    config: Arc<LoggerConfig>,
}

impl TagLevelFilter {
    /// Filter applying the rules of `config`.
    pub fn new(config: Arc<LoggerConfig>) -> Self {
        Self { config }
    }

    /// The rule table this filter consults.
    pub fn config(&self) -> &Arc<LoggerConfig> {
        &self.config
    }

    /// Whether an event tagged `tag` at `level` passes the filter.
    pub fn allows(&self, tag: &str, level: &tracing::Level) -> bool {
        self.config.is_enabled(tag, Level::from(level))
    }
}

/// Tag derived from an event target.
pub(crate) fn tag_from_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

impl<Sub> Filter<Sub> for TagLevelFilter
where
    Sub: Subscriber,
{
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, Sub>) -> bool {
        // Spans always pass; events are decided in event_enabled
        true
    }

    fn event_enabled(&self, event: &tracing::Event<'_>, _cx: &Context<'_, Sub>) -> bool {
        let metadata = event.metadata();

        let mut visitor = TagVisitor::new();
        event.record(&mut visitor);

        match visitor.into_tag() {
            Some(tag) => self.allows(&tag, metadata.level()),
            None => self.allows(&tag_from_target(metadata.target()), metadata.level()),
        }
    }
}
