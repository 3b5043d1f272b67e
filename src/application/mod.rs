//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and manages the runtime behavior:
//! - Pattern filter (tag matching through a bounded compilation cache)
//! - Level configuration (pattern rules with a default level)
//! - Tagged loggers and their identity cache
//! - Registry wiring all of the above
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod cache;
pub mod config;
pub mod filter;
pub mod logger;
pub mod metrics;
pub mod ports;
pub mod registry;
