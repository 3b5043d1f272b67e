//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::{level::Level, tag::Tag};
use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

/// A single message handed to a sink.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// Tag of the emitting logger
    pub tag: &'a Tag,
    /// Severity of the message
    pub level: Level,
    /// Message text
    pub message: &'a str,
    /// Optional error attached to the message
    pub error: Option<&'a (dyn std::error::Error + 'static)>,
}

/// Port for emitting log records.
///
/// Sinks decide where records go (tracing, a test buffer, ...). Loggers ask
/// `is_enabled` first and only build a record when it returns true.
pub trait LogSink: Send + Sync + Debug {
    /// Whether a record at `level` for `tag` would be emitted.
    fn is_enabled(&self, _tag: &Tag, _level: Level) -> bool {
        true
    }

    /// Emit a record.
    fn log(&self, record: &LogRecord<'_>);
}

/// Candidate entry for eviction consideration.
///
/// Sequence numbers come from a per-cache monotonic counter, so ordering
/// does not depend on map iteration order or wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionCandidate<K> {
    /// The key of the entry
    pub key: K,
    /// Sequence number assigned when the entry was inserted
    pub inserted: u64,
    /// Sequence number of the most recent access
    pub last_access: u64,
}

/// Port for eviction policy decisions.
///
/// The bounded pattern cache delegates victim selection to a pluggable
/// policy. Infrastructure provides `FifoEviction` and `LruEviction`.
pub trait EvictionPolicy<K>: Send + Sync + Debug
where
    K: Clone,
{
    /// Select a victim from the given candidates.
    ///
    /// # Returns
    /// The key of the entry to evict, or None if no eviction should occur
    fn select_victim(&self, candidates: &[EvictionCandidate<K>]) -> Option<K>;

    /// Check if inserting one more entry requires an eviction first.
    fn should_evict(&self, current_entries: usize) -> bool;

    /// Maximum number of entries kept.
    fn capacity(&self) -> usize;
}

/// Port for concurrent key-value storage.
///
/// This abstraction allows the application layer to store and retrieve values
/// without depending on specific concurrent data structure implementations.
/// Infrastructure provides concrete implementations (ShardedStorage).
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// Creation and access happen under the same shard lock, so concurrent
    /// callers for one key observe a single value.
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    /// Clone the value stored under `key`.
    fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone;

    /// Check if a key exists.
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Remove a key and return its value.
    fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;

    /// Clear all entries from the storage.
    fn clear(&self);

    /// Iterate over all entries, providing access to both key and value.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V);
}
