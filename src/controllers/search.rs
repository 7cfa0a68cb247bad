use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use validator::Validate;

use crate::core::adapter::{adapt_candidates, adapt_listings};
use crate::core::normalizer::normalize;
use crate::core::validate::first_message;
use crate::models::{CacheEntry, Entity, FilterCriteria, SearchState, SearchStatus};
use crate::services::backend::SearchBackend;
use crate::services::cache::ResultCache;
use crate::services::prefs::Preferences;
use crate::services::store::Store;

const FETCH_FALLBACK_MESSAGE: &str = "Search failed";
const NO_LISTINGS_MESSAGE: &str = "No properties found matching these criteria";
const NO_CANDIDATES_MESSAGE: &str = "No roommates found matching these criteria";

/// Which search surface this controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDomain {
    Listings,
    Roommates,
}

/// Orchestrates one search surface for one user scope.
///
/// Pipeline per `search` call: validate → normalize → cache-check →
/// fetch → adapt → persist, in that order. The UI observes state
/// snapshots; no method returns results directly.
///
/// Overlapping calls are not cancelled; each response carries the
/// sequence number of its request and is discarded if a newer request
/// was issued while it was in flight, so the newest requested results
/// always win.
pub struct SearchController<S: Store> {
    backend: Arc<dyn SearchBackend>,
    cache: ResultCache<S>,
    prefs: Preferences<S>,
    scope_id: String,
    domain: SearchDomain,
    state: Mutex<SearchState>,
    seq: AtomicU64,
}

impl<S: Store> SearchController<S> {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        store: Arc<S>,
        namespace: impl Into<String>,
        scope_id: impl Into<String>,
        domain: SearchDomain,
    ) -> Self {
        let namespace = namespace.into();
        Self {
            backend,
            cache: ResultCache::new(Arc::clone(&store), namespace.clone()),
            prefs: Preferences::new(store, namespace),
            scope_id: scope_id.into(),
            domain,
            state: Mutex::new(SearchState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the observable state.
    pub fn state(&self) -> SearchState {
        self.lock_state().clone()
    }

    /// Run a search for the given raw filter criteria.
    ///
    /// Invalid criteria surface the first violated rule and touch neither
    /// the network nor the cache. Repeating the last applied search while
    /// results are present short-circuits without a fetch.
    pub async fn search(&self, raw: FilterCriteria) {
        if let Err(errors) = raw.validate() {
            let message = first_message(&errors);
            tracing::info!("rejecting search: {}", message);
            let mut state = self.lock_state();
            state.status = SearchStatus::Error;
            state.error_message = Some(message);
            state.info_message = None;
            return;
        }

        let key = normalize(&raw);
        let city = raw
            .city
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        {
            let mut state = self.lock_state();
            if state.last_applied_key.as_deref() == Some(key.as_str())
                && !state.results.is_empty()
            {
                tracing::debug!("filters unchanged, reusing current results");
                state.current_city = city;
                return;
            }

            state.status = SearchStatus::Loading;
            state.error_message = None;
            state.info_message = None;
            state.criteria = raw.clone();
            state.current_city = city.clone();
        }

        // Remember the chosen city as the default landing context.
        self.prefs.set_default_city(&city);
        if let Some(locality) = raw.locality.as_deref() {
            self.prefs.set_locality_for(&self.scope_id, &city, locality);
        }

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = match self.domain {
            SearchDomain::Listings => self.backend.fetch_listings(&raw).await,
            SearchDomain::Roommates => self.backend.fetch_candidates(&raw).await,
        };

        if self.seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("discarding stale response for key {}", key);
            return;
        }

        match fetched {
            Ok(payload) => {
                let results = self.adapt(&payload);
                tracing::info!(
                    "fetched {} results for scope {} ({:?})",
                    results.len(),
                    self.scope_id,
                    self.domain
                );

                let entry = CacheEntry {
                    key: key.clone(),
                    scope_id: self.scope_id.clone(),
                    filters: raw,
                    results: results.clone(),
                    stored_at: chrono::Utc::now(),
                };
                self.cache.save(&self.scope_id, &entry);

                let mut state = self.lock_state();
                state.info_message = results
                    .is_empty()
                    .then(|| self.no_results_message().to_string());
                state.results = results;
                state.last_applied_key = Some(key);
                state.status = SearchStatus::Idle;
                state.error_message = None;
            }
            Err(e) => {
                tracing::warn!("search fetch failed for scope {}: {}", self.scope_id, e);
                let message = e.to_string();
                let mut state = self.lock_state();
                state.status = SearchStatus::Error;
                state.error_message = Some(if message.is_empty() {
                    FETCH_FALLBACK_MESSAGE.to_string()
                } else {
                    message
                });
                state.results.clear();
            }
        }
    }

    /// Mount path: restore the cached last search, or fall back to an
    /// initial fetch for a resolved default city.
    ///
    /// City resolution priority: route-provided, then caller-provided,
    /// then the globally remembered default. With no resolvable city the
    /// controller stays idle.
    pub async fn restore_or_fetch(&self, route_city: Option<&str>, caller_city: Option<&str>) {
        if let Some(entry) = self.cache.load(&self.scope_id) {
            tracing::info!(
                "restored {} cached results for scope {}",
                entry.results.len(),
                self.scope_id
            );
            let mut state = self.lock_state();
            state.current_city = entry
                .filters
                .city
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string();
            state.criteria = entry.filters;
            state.info_message = entry
                .results
                .is_empty()
                .then(|| self.no_results_message().to_string());
            state.results = entry.results;
            state.last_applied_key = Some(entry.key);
            state.status = SearchStatus::Idle;
            state.error_message = None;
            return;
        }

        let city = resolve_city(route_city)
            .or_else(|| resolve_city(caller_city))
            .or_else(|| self.prefs.default_city());
        let Some(city) = city else {
            tracing::debug!("no cached entry and no default city, staying idle");
            return;
        };

        let mut criteria = FilterCriteria::for_city(&city);
        if let Some(locality) = self.prefs.locality_for(&self.scope_id, &city) {
            criteria.locality = Some(locality);
        }
        self.search(criteria).await;
    }

    /// Clear state, the cache slot, and the last applied key.
    pub fn reset(&self) {
        self.cache.clear(&self.scope_id);
        let mut state = self.lock_state();
        *state = SearchState::default();
    }

    fn no_results_message(&self) -> &'static str {
        match self.domain {
            SearchDomain::Listings => NO_LISTINGS_MESSAGE,
            SearchDomain::Roommates => NO_CANDIDATES_MESSAGE,
        }
    }

    fn adapt(&self, payload: &serde_json::Value) -> Vec<Entity> {
        match self.domain {
            SearchDomain::Listings => adapt_listings(payload),
            SearchDomain::Roommates => adapt_candidates(payload),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SearchState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn resolve_city(city: Option<&str>) -> Option<String> {
    city.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
