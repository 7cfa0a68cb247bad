//! RoomScout Core - search, filter and cache orchestration
//!
//! This library provides the client-side core of the RoomScout rental and
//! roommate finder: it canonicalizes filter criteria into stable cache
//! keys, decides when a network fetch is needed versus reusing cached
//! results, persists the last search across restarts, reconciles
//! heterogeneous backend payload shapes into one entity schema, and runs
//! a polling chat session. The HTTP transport, rendering layer, routing
//! and auth are injected collaborators.

pub mod config;
pub mod controllers;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use controllers::{ChatSession, SearchController, SearchDomain};
pub use core::{adapt_candidates, adapt_conversation, adapt_listings, normalize};
pub use models::{
    CacheEntry, ChatMessage, ChatState, ChatStatus, CityOption, Entity, EntityKind,
    FilterCriteria, SearchState, SearchStatus,
};
pub use services::{
    scope_for, BackendError, ChatBackend, FileStore, HttpBackend, MemoryStore, Preferences,
    ResultCache, SearchBackend, Store,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let key = normalize(&FilterCriteria::for_city("Pune"));
        assert!(key.contains("\"city\":\"pune\""));
        assert_eq!(scope_for(None), "guest");
    }
}
