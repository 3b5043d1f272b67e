//! Integration tests for pattern matching and the compiled pattern cache.

use std::sync::Arc;
use tracing_tags::{LogFilter, LruEviction, DEFAULT_PATTERN_CACHE_CAPACITY};

#[test]
fn test_single_wildcard_does_not_cross_segments() {
    let filter = LogFilter::new();

    assert!(!filter.matches("EduGo.Auth.Login.OAuth", "EduGo.Auth.*"));
    assert!(filter.matches("EduGo.Auth.Login.OAuth", "EduGo.Auth.**"));
}

#[test]
fn test_double_wildcard_positions() {
    let filter = LogFilter::new();

    // Trailing ** also matches zero segments
    assert!(filter.matches("EduGo.Auth", "EduGo.Auth.**"));
    assert!(filter.matches("EduGo.Auth.Login", "**.Login"));
    assert!(filter.matches("EduGo.Auth.Session.Login", "EduGo.**.Login"));
    assert!(filter.matches("EduGo.Login", "EduGo.**.Login"));
    assert!(!filter.matches("EduGo.Logout", "EduGo.**.Login"));
    assert!(filter.matches("Anything.At.All", "**"));
}

#[test]
fn test_partial_segment_wildcard() {
    let filter = LogFilter::new();

    assert!(filter.matches("EduGo.AuthV2.Login", "EduGo.Auth*.Login"));
    assert!(!filter.matches("EduGo.Auth.V2.Login", "EduGo.Auth*.Login"));
}

#[test]
fn test_regex_patterns() {
    let filter = LogFilter::new();

    assert!(filter.matches("EduGo.Auth.Login", "regex:EduGo\\.(Auth|Network)\\..*"));
    assert!(!filter.matches("EduGo.Storage.Disk", "regex:EduGo\\.(Auth|Network)\\..*"));
    // Anchored on the whole tag
    assert!(!filter.matches("EduGo.Auth", "regex:Auth"));
    assert!(!filter.matches("EduGo.Auth", "regex:[unclosed"));
}

#[test]
fn test_literal_dots_are_not_regex() {
    let filter = LogFilter::new();
    assert!(!filter.matches("EduGoXAuth", "EduGo.Auth"));
}

#[test]
fn test_cache_stays_bounded() {
    let filter = LogFilter::new();
    for i in 0..(DEFAULT_PATTERN_CACHE_CAPACITY * 3) {
        filter.matches("EduGo.Auth", &format!("EduGo.Feature{}.**", i));
        assert!(filter.cache_size() <= DEFAULT_PATTERN_CACHE_CAPACITY);
    }

    let metrics = filter.metrics().snapshot();
    assert_eq!(metrics.patterns_evicted, 200);
    assert_eq!(metrics.cache_misses, 300);
}

#[test]
fn test_lru_keeps_hot_patterns() {
    let filter = LogFilter::builder()
        .with_eviction_policy(Arc::new(LruEviction::new(3)))
        .build()
        .unwrap();

    for i in 0..10 {
        filter.matches("EduGo.Auth", "EduGo.**");
        filter.matches("EduGo.Auth", &format!("Cold{}", i));
    }

    assert!(filter.is_cached("EduGo.**"));
    assert_eq!(filter.cache_size(), 3);
}

#[test]
fn test_concurrent_matching_with_eviction() {
    use std::thread;

    let filter = Arc::new(LogFilter::builder().with_capacity(16).build().unwrap());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                for i in 0..200 {
                    let pattern = format!("T{}.P{}.*", t, i % 40);
                    assert!(filter.matches(&format!("T{}.P{}.X", t, i % 40), &pattern));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(filter.cache_size() <= 16);
}
