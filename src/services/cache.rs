use std::sync::Arc;

use crate::core::normalizer::normalize;
use crate::models::{CacheEntry, FilterCriteria};
use crate::services::store::Store;

/// Single-slot persistent result cache, one entry per user scope.
///
/// Remembers the last search (filters + results) so a reload restores it
/// without a refetch. Deliberately not a general LRU: only "last search"
/// needs remembering, and writes are whole-entry replacements with
/// last-write-wins semantics. Entries never expire; `stored_at` is kept
/// so embedders can impose their own staleness policy.
pub struct ResultCache<S: Store> {
    store: Arc<S>,
    namespace: String,
}

impl<S: Store> ResultCache<S> {
    pub fn new(store: Arc<S>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Read the persisted entry for a scope.
    ///
    /// Fails soft: a missing or undecodable value is a miss, never an error.
    pub fn load(&self, scope_id: &str) -> Option<CacheEntry> {
        let key = CacheKey::results(&self.namespace, scope_id);
        let raw = self.store.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(entry) => {
                tracing::debug!("cache hit: {}", key);
                Some(entry)
            }
            Err(e) => {
                tracing::warn!("discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Overwrite the scope's entry. Durable across restarts.
    pub fn save(&self, scope_id: &str, entry: &CacheEntry) {
        let key = CacheKey::results(&self.namespace, scope_id);
        match serde_json::to_string(entry) {
            Ok(encoded) => {
                self.store.set(&key, &encoded);
                tracing::debug!("cache set: {} ({} results)", key, entry.results.len());
            }
            Err(e) => tracing::warn!("failed to encode cache entry {}: {}", key, e),
        }
    }

    /// True iff the entry's filters normalize to the same key as `criteria`.
    pub fn matches(&self, entry: &CacheEntry, criteria: &FilterCriteria) -> bool {
        normalize(&entry.filters) == normalize(criteria)
    }

    /// Drop the scope's entry.
    pub fn clear(&self, scope_id: &str) {
        self.store.remove(&CacheKey::results(&self.namespace, scope_id));
    }
}

/// Cache key builder.
pub struct CacheKey;

impl CacheKey {
    /// Key for a scope's cached search results + originating filters.
    pub fn results(namespace: &str, scope_id: &str) -> String {
        format!("{}:results:{}", namespace, scope_id)
    }

    /// Key for the globally remembered default city.
    pub fn default_city(namespace: &str) -> String {
        format!("{}:defaultCity", namespace)
    }

    /// Key for a scope's remembered locality within a city.
    pub fn locality(namespace: &str, scope_id: &str, city: &str) -> String {
        format!("{}:locality:{}:{}", namespace, scope_id, city.trim().to_lowercase())
    }
}

/// Derive the cache scope from the acting user's identity.
///
/// Anonymous sessions share the "guest" scope; caches never leak across
/// identities because every key embeds the scope.
pub fn scope_for(user_id: Option<&str>) -> String {
    user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or("guest")
        .to_string()
}
