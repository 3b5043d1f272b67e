//! Eviction policy adapters for the bounded pattern cache.
//!
//! In hexagonal architecture, these are adapters (infrastructure layer)
//! that implement the EvictionPolicy port (application layer).

pub mod fifo;
pub mod lru;

pub use fifo::FifoEviction;
pub use lru::LruEviction;
