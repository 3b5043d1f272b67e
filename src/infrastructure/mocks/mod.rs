//! Mock implementations for testing.
//!
//! This module provides test doubles for the sink port and for a tracing
//! subscriber, so filtering can be asserted without real output.

pub mod layer;
pub mod sink;

pub use layer::{CapturedEvent, MockCaptureLayer};
pub use sink::{MockSink, RecordedLog};
