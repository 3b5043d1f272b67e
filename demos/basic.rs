//! Basic example demonstrating per-tag level rules.
//!
//! Rules are loaded from a directive string, applied to both tagged loggers
//! and plain `tracing` events, and changed at runtime.

use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_tags::{Level, LoggerRegistry};

fn main() {
    // Default level WARNING; everything under EduGo.Auth at DEBUG
    let registry = LoggerRegistry::builder()
        .with_directives("warn,EduGo.Auth.**=debug")
        .build()
        .expect("directives are valid");

    // The same rules filter events that carry a `tag` field
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(registry.tracing_filter()))
        .init();

    println!("=== Tagged Logging Example ===\n");

    let login = registry.logger("EduGo.Auth.Login").expect("valid tag");
    let http = registry.logger("EduGo.Network.HTTP").expect("valid tag");

    println!("EduGo.Auth.** is at DEBUG, everything else at WARNING:");
    login.debug("checking credentials");
    http.info("GET /courses (hidden)");
    http.warn("slow response");
    info!(tag = "EduGo.Auth.Session", "session refreshed");

    println!("\nLowering EduGo.Network.* to INFO at runtime:");
    registry
        .config()
        .set_level("EduGo.Network.*", Level::Info)
        .expect("pattern is not blank");
    http.info("GET /courses");
    http.debug("response headers (hidden)");

    println!("\nChild loggers get their own tag:");
    let oauth = login.with_child("OAuth").expect("valid segment");
    oauth.info("token exchanged");

    let metrics = registry.filter().metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Pattern cache: {} hits, {} misses, {} cached",
        metrics.cache_hits,
        metrics.cache_misses,
        registry.filter().cache_size()
    );
}
