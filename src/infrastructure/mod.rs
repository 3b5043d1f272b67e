//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Pattern compilation cache and its eviction policies
//! - Storage implementations (sharded maps)
//! - Sinks (tracing output, level filtering)
//! - Tracing integration (per-layer `Filter`)

pub mod eviction;
pub mod layer;
pub mod pattern_cache;
pub mod sink;
pub mod storage;
pub(crate) mod visitor;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides a recording sink and a capturing
/// tracing layer.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// tracing-tags = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
