//! Integration tests for the tracing subscriber filter.

use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;
use tracing_tags::infrastructure::mocks::MockCaptureLayer;
use tracing_tags::{Level, LoggerConfig, LoggerRegistry, TagLevelFilter, TracingSink};

#[test]
fn test_tagged_events_are_filtered() {
    let config = Arc::new(LoggerConfig::new());
    config.set_level("EduGo.Auth.*", Level::Info).unwrap();

    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry()
        .with(capture.clone().with_filter(TagLevelFilter::new(config)));

    tracing::subscriber::with_default(subscriber, || {
        debug!(tag = "EduGo.Auth.Login", "hidden");
        info!(tag = "EduGo.Auth.Login", "visible");
        debug!(tag = "EduGo.Network.HTTP", "visible");
    });

    let events = capture.get_captured();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.message == "visible"));
}

#[test]
fn test_registry_loggers_through_tracing() {
    let registry = LoggerRegistry::builder()
        .with_sink(Arc::new(TracingSink::new()))
        .with_directives("warn,EduGo.Auth.**=debug")
        .build()
        .unwrap();

    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry()
        .with(capture.clone().with_filter(registry.tracing_filter()));

    tracing::subscriber::with_default(subscriber, || {
        registry.logger("EduGo.Auth.Login").unwrap().debug("login debug");
        registry.logger("EduGo.Network.HTTP").unwrap().info("http info");
        registry.logger("EduGo.Network.HTTP").unwrap().warn("http warn");
        info!(target: "third_party::client", "plain info");
    });

    let events = capture.get_captured();
    let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["login debug", "http warn"]);
    assert_eq!(events[0].tag.as_deref(), Some("EduGo.Auth.Login"));
    assert_eq!(events[1].level, tracing::Level::WARN);
}

#[test]
fn test_filter_only_affects_its_layer() {
    let config = LoggerConfig::builder()
        .with_default_level(Level::Error)
        .build()
        .map(Arc::new)
        .unwrap();

    let filtered = MockCaptureLayer::new();
    let unfiltered = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry()
        .with(filtered.clone().with_filter(TagLevelFilter::new(config)))
        .with(unfiltered.clone());

    tracing::subscriber::with_default(subscriber, || {
        warn!(tag = "EduGo.Auth", "warning");
    });

    assert_eq!(filtered.count(), 0);
    assert_eq!(unfiltered.count(), 1);
}

#[test]
fn test_runtime_rule_changes() {
    let config = Arc::new(LoggerConfig::new());
    config.set_level("EduGo.Network.**", Level::Error).unwrap();

    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry()
        .with(capture.clone().with_filter(TagLevelFilter::new(Arc::clone(&config))));

    tracing::subscriber::with_default(subscriber, || {
        info!(tag = "EduGo.Network.HTTP", "before");
        config.remove_level("EduGo.Network.**");
        info!(tag = "EduGo.Network.HTTP", "after");
    });

    let messages: Vec<_> = capture
        .get_captured()
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(messages, vec!["after"]);
}
