// Query cache: server-confirmed read results keyed by logical query name.
//
// Mutations never write values here directly. They invalidate a key, which
// marks the entry stale and forces the next read decision to go back to the
// server. The stale value is still available for rendering (`read_any`), so
// the UI keeps showing the last server-confirmed list during a refetch
// instead of flashing back to a loading state.

use std::collections::HashMap;

use crate::sport::Sport;

// ---------------------------------------------------------------------------
// QueryKey
// ---------------------------------------------------------------------------

/// Logical name of a cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full sport catalog (`listAllSports`).
    Catalog,
    /// The user's subscribed sports (`listUserSports`).
    Subscriptions,
}

// ---------------------------------------------------------------------------
// QueryCache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<Sport>,
    stale: bool,
}

/// In-process cache with read/store/invalidate by key.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fresh value for `key`, or `None` when the key is missing or has
    /// been invalidated since it was stored.
    pub fn read(&self, key: QueryKey) -> Option<&[Sport]> {
        self.entries
            .get(&key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.value.as_slice())
    }

    /// The last stored value for `key`, stale or not. Used for rendering
    /// during a refetch window.
    pub fn read_any(&self, key: QueryKey) -> Option<&[Sport]> {
        self.entries.get(&key).map(|entry| entry.value.as_slice())
    }

    /// Store a server-confirmed value, clearing any staleness.
    pub fn store(&mut self, key: QueryKey, value: Vec<Sport>) {
        self.entries.insert(key, CacheEntry { value, stale: false });
    }

    /// Mark the entry for `key` stale. A missing entry is already as stale
    /// as it gets, so this is a no-op for unknown keys.
    pub fn invalidate(&mut self, key: QueryKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.stale = true;
        }
    }

    /// Whether `key` holds a fresh value.
    pub fn is_fresh(&self, key: QueryKey) -> bool {
        self.read(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
