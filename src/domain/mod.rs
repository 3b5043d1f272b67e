//! Domain layer - pure types with no shared state.
//!
//! This layer contains the core concepts of tag-based filtering:
//! - Hierarchical tags and their decomposition
//! - Severity levels
//! - Tag patterns (literal, wildcard, regex)
//!
//! All types in this layer are pure and easily testable.

pub mod level;
pub mod pattern;
pub mod tag;
