// Integration tests for RoomScout Core

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use roomscout_core::services::BackendError;
use roomscout_core::{
    normalize, scope_for, ChatBackend, ChatSession, ChatStatus, CityOption, FilterCriteria,
    MemoryStore, ResultCache, SearchBackend, SearchController, SearchDomain, SearchStatus,
};

/// Backend double serving canned payloads and counting calls.
struct FakeBackend {
    listings: Value,
    candidates: Value,
    search_calls: AtomicUsize,
    chat_fetches: AtomicUsize,
    chat_sends: AtomicUsize,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            listings: json!({"data": {"data": [
                {"email": "owner@x", "name": "Lakeside Flat", "BHK": "2", "rent": 15000, "city": "Pune"},
            ]}}),
            candidates: json!({"data": {"roommates": [
                {"email": "asha@x", "username": "Asha", "city": "Pune", "hobbies": "Reading, Gaming, "},
                {"emailId": "ravi@x", "name": "Ravi", "city": "Pune", "hobbies": ["Cooking"]},
            ]}}),
            search_calls: AtomicUsize::new(0),
            chat_fetches: AtomicUsize::new(0),
            chat_sends: AtomicUsize::new(0),
        }
    }

    fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn fetch_listings(&self, _criteria: &FilterCriteria) -> Result<Value, BackendError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listings.clone())
    }

    async fn fetch_candidates(&self, _criteria: &FilterCriteria) -> Result<Value, BackendError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.candidates.clone())
    }

    async fn lookup_cities(&self, query: &str) -> Result<Vec<CityOption>, BackendError> {
        Ok(["Pune", "Mumbai"]
            .iter()
            .filter(|c| c.to_lowercase().starts_with(&query.to_lowercase()))
            .map(|c| CityOption {
                label: c.to_string(),
                value: c.to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn fetch_conversation(&self, peer_id: &str) -> Result<Value, BackendError> {
        self.chat_fetches.fetch_add(1, Ordering::SeqCst);
        let mut messages = vec![json!({"senderId": peer_id, "body": "hi"})];
        for _ in 0..self.chat_sends.load(Ordering::SeqCst) {
            messages.push(json!({"senderId": "me@x", "body": "reply"}));
        }
        Ok(json!({"data": {"data": {"messages": messages}}}))
    }

    async fn send_message(&self, _peer_id: &str, _body: &str) -> Result<(), BackendError> {
        self.chat_sends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn roommate_controller(
    backend: Arc<FakeBackend>,
    store: Arc<MemoryStore>,
    user: Option<&str>,
) -> SearchController<MemoryStore> {
    SearchController::new(
        backend,
        store,
        "roomscout",
        scope_for(user),
        SearchDomain::Roommates,
    )
}

#[tokio::test]
async fn test_end_to_end_search_reload_cycle() {
    let backend = Arc::new(FakeBackend::new());
    let store = Arc::new(MemoryStore::new());

    // Session 1: no cache, route supplies the city
    let ctl = roommate_controller(Arc::clone(&backend), Arc::clone(&store), Some("u1@x"));
    ctl.restore_or_fetch(Some("Pune"), None).await;

    let state = ctl.state();
    assert_eq!(backend.search_calls(), 1);
    assert_eq!(state.status, SearchStatus::Idle);
    assert_eq!(state.results.len(), 2);
    assert_eq!(state.criteria.city.as_deref(), Some("Pune"));

    // Tag lists are materialized regardless of raw shape
    assert_eq!(state.results[0].hobbies, vec!["Reading", "Gaming"]);
    assert_eq!(state.results[1].hobbies, vec!["Cooking"]);
    // Identity probed through aliases
    assert_eq!(state.results[1].id, "ravi@x");

    // Persisted under the normalized key for the scope
    let cache = ResultCache::new(Arc::clone(&store), "roomscout");
    let entry = cache.load("u1@x").expect("entry persisted");
    assert_eq!(entry.key, normalize(&FilterCriteria::for_city("Pune")));

    // Session 2 (simulated reload): restore with zero fetches
    let ctl2 = roommate_controller(Arc::clone(&backend), Arc::clone(&store), Some("u1@x"));
    ctl2.restore_or_fetch(None, None).await;

    assert_eq!(backend.search_calls(), 1);
    let restored = ctl2.state();
    assert_eq!(restored.results.len(), 2);
    assert_eq!(restored.current_city, "Pune");

    // Re-submitting the same filters still does not refetch
    ctl2.search(FilterCriteria::for_city("  PUNE ")).await;
    assert_eq!(backend.search_calls(), 1);

    // A different user does not see u1's cache
    let other = roommate_controller(Arc::clone(&backend), Arc::clone(&store), None);
    other.restore_or_fetch(None, None).await;
    // No cached entry for guest; falls back to the remembered city and fetches
    assert_eq!(backend.search_calls(), 2);
}

#[tokio::test]
async fn test_listing_search_uses_listing_adapter() {
    let backend = Arc::new(FakeBackend::new());
    let store = Arc::new(MemoryStore::new());
    let ctl = SearchController::new(
        Arc::clone(&backend) as Arc<dyn SearchBackend>,
        store,
        "roomscout",
        "u1@x",
        SearchDomain::Listings,
    );

    ctl.search(FilterCriteria::for_city("Pune")).await;

    let state = ctl.state();
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.results[0].bhk.as_deref(), Some("2"));
    assert_eq!(state.results[0].rent, Some(15_000));
}

#[tokio::test]
async fn test_invalid_filters_never_reach_network() {
    let backend = Arc::new(FakeBackend::new());
    let ctl = roommate_controller(Arc::clone(&backend), Arc::new(MemoryStore::new()), None);

    // Missing city
    ctl.search(FilterCriteria::default()).await;
    let state = ctl.state();
    assert_eq!(state.status, SearchStatus::Error);
    assert_eq!(state.error_message.as_deref(), Some("City is required"));

    // Inverted age range
    let mut criteria = FilterCriteria::for_city("Pune");
    criteria.min_age = Some(30);
    criteria.max_age = Some(20);
    ctl.search(criteria).await;

    assert_eq!(backend.search_calls(), 0);
}

#[tokio::test]
async fn test_error_state_is_retriable() {
    struct FlakyBackend {
        calls: AtomicUsize,
        inner: FakeBackend,
    }

    #[async_trait]
    impl SearchBackend for FlakyBackend {
        async fn fetch_listings(&self, criteria: &FilterCriteria) -> Result<Value, BackendError> {
            self.fetch_candidates(criteria).await
        }

        async fn fetch_candidates(&self, criteria: &FilterCriteria) -> Result<Value, BackendError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(BackendError::Api("temporarily down".to_string()));
            }
            self.inner.fetch_candidates(criteria).await
        }

        async fn lookup_cities(&self, query: &str) -> Result<Vec<CityOption>, BackendError> {
            self.inner.lookup_cities(query).await
        }
    }

    let backend = Arc::new(FlakyBackend {
        calls: AtomicUsize::new(0),
        inner: FakeBackend::new(),
    });
    let ctl = SearchController::new(
        Arc::clone(&backend) as Arc<dyn SearchBackend>,
        Arc::new(MemoryStore::new()),
        "roomscout",
        "u1@x",
        SearchDomain::Roommates,
    );

    ctl.search(FilterCriteria::for_city("Pune")).await;
    let state = ctl.state();
    assert_eq!(state.status, SearchStatus::Error);
    assert!(state.results.is_empty());

    // Same criteria retried after a failure must fetch again (no
    // short-circuit on an error state with empty results)
    ctl.search(FilterCriteria::for_city("Pune")).await;
    let state = ctl.state();
    assert_eq!(state.status, SearchStatus::Idle);
    assert_eq!(state.results.len(), 2);
}

#[tokio::test]
async fn test_chat_send_and_resync() {
    let backend = Arc::new(FakeBackend::new());
    let session = ChatSession::new(Arc::clone(&backend) as Arc<dyn ChatBackend>, "me@x");

    session.load("asha@x").await;
    assert_eq!(session.state().messages.len(), 1);

    session.send("asha@x", "hello!").await;
    let state = session.state();
    assert_eq!(state.status, ChatStatus::Idle);
    assert_eq!(state.messages.len(), 2);
    assert_eq!(backend.chat_fetches.load(Ordering::SeqCst), 2);
    assert_eq!(backend.chat_sends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_self_chat_is_a_distinct_state_with_no_traffic() {
    let backend = Arc::new(FakeBackend::new());
    let session = ChatSession::new(Arc::clone(&backend) as Arc<dyn ChatBackend>, "me@x");

    session.load("me@x").await;

    let state = session.state();
    assert_eq!(state.status, ChatStatus::SelfConversation);
    assert!(state.error_message.is_none());
    assert_eq!(backend.chat_fetches.load(Ordering::SeqCst), 0);
    assert_eq!(backend.chat_sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_city_lookup_collaborator() {
    let backend = Arc::new(FakeBackend::new());
    let cities = backend.lookup_cities("pu").await.unwrap();

    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].value, "Pune");
}
