use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use pngcard_core::CardRecord;

/// Cached outcome of one decode: the card, or `None` for a recorded failure.
pub type CachedCard = Option<Arc<CardRecord>>;

/// Per-identity memo of decode outcomes, failures included.
///
/// Entries live until [`DecodeCache::clear`]; nothing is evicted on its own.
/// Readers share the lock, so lookups from many threads do not serialize.
#[derive(Debug, Default)]
pub struct DecodeCache {
    entries: RwLock<HashMap<String, CachedCard>>,
}

impl DecodeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if `identity` has never been decoded, otherwise the recorded
    /// outcome.
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<CachedCard> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identity)
            .cloned()
    }

    /// Record an outcome unless one already exists, and return whichever
    /// outcome is now stored. Concurrent decoders of the same identity all end
    /// up holding the first writer's record.
    #[must_use]
    pub fn insert_if_absent(&self, identity: &str, outcome: CachedCard) -> CachedCard {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(identity.to_string())
            .or_insert(outcome)
            .clone()
    }

    #[must_use]
    pub fn remove(&self, identity: &str) -> Option<CachedCard> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identity)
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
