//! FIFO (First In, First Out) eviction adapter.

use crate::application::ports::{EvictionCandidate, EvictionPolicy};

/// FIFO eviction policy with entry count limit.
///
/// Evicts the oldest inserted entry when the limit is reached. Accessing an
/// entry does not change its position.
#[derive(Debug, Clone)]
pub struct FifoEviction {
    /// Maximum number of entries before eviction
    max_entries: usize,
}

impl FifoEviction {
    /// Create a new FIFO eviction policy with the given entry limit.
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }
}

impl<K> EvictionPolicy<K> for FifoEviction
where
    K: Clone,
{
    fn select_victim(&self, candidates: &[EvictionCandidate<K>]) -> Option<K> {
        candidates
            .iter()
            .min_by_key(|candidate| candidate.inserted)
            .map(|candidate| candidate.key.clone())
    }

    fn should_evict(&self, current_entries: usize) -> bool {
        current_entries >= self.max_entries
    }

    fn capacity(&self) -> usize {
        self.max_entries
    }
}
