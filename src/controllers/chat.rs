use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::adapter::adapt_conversation;
use crate::models::{ChatState, ChatStatus};
use crate::services::backend::ChatBackend;

/// One conversation with one peer, polling-based.
///
/// State is replaced wholesale on every load; after a send the
/// conversation is unconditionally re-fetched so the backend stays the
/// single source of truth (no optimistic local append, no retry).
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    own_id: String,
    state: Mutex<ChatState>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>, own_id: impl Into<String>) -> Self {
        Self {
            backend,
            // Normalized once so the self-chat guard can't be defeated by
            // stray whitespace in the configured identity.
            own_id: own_id.into().trim().to_string(),
            state: Mutex::new(ChatState::default()),
        }
    }

    /// Snapshot of the observable state.
    pub fn state(&self) -> ChatState {
        self.lock_state().clone()
    }

    /// Fetch the full conversation with a peer, replacing local state.
    ///
    /// A self-targeted conversation is refused before any fetch and
    /// surfaced as its own status, not as an error.
    pub async fn load(&self, peer_id: &str) {
        if self.is_self(peer_id) {
            tracing::debug!("refusing self-conversation for {}", peer_id);
            let mut state = self.lock_state();
            state.peer_id = peer_id.to_string();
            state.messages.clear();
            state.status = ChatStatus::SelfConversation;
            state.error_message = None;
            return;
        }

        {
            let mut state = self.lock_state();
            state.peer_id = peer_id.to_string();
            state.status = ChatStatus::Loading;
            state.error_message = None;
        }

        match self.backend.fetch_conversation(peer_id).await {
            Ok(payload) => {
                let messages = adapt_conversation(&payload);
                tracing::debug!("loaded {} messages with {}", messages.len(), peer_id);
                let mut state = self.lock_state();
                state.messages = messages;
                state.status = ChatStatus::Idle;
            }
            Err(e) => {
                tracing::warn!("failed to load conversation with {}: {}", peer_id, e);
                let mut state = self.lock_state();
                state.status = ChatStatus::Error;
                state.error_message = Some(e.to_string());
            }
        }
    }

    /// Send a message, then re-fetch the conversation for the
    /// authoritative post-send state.
    ///
    /// Empty or whitespace-only bodies are dropped with no side effect.
    pub async fn send(&self, peer_id: &str, body: &str) {
        let body = body.trim();
        if body.is_empty() {
            return;
        }

        if self.is_self(peer_id) {
            tracing::debug!("refusing self-targeted send to {}", peer_id);
            let mut state = self.lock_state();
            state.peer_id = peer_id.to_string();
            state.status = ChatStatus::SelfConversation;
            state.error_message = None;
            return;
        }

        if let Err(e) = self.backend.send_message(peer_id, body).await {
            tracing::warn!("failed to send message to {}: {}", peer_id, e);
            let mut state = self.lock_state();
            state.status = ChatStatus::Error;
            state.error_message = Some(e.to_string());
            return;
        }

        self.load(peer_id).await;
    }

    fn is_self(&self, peer_id: &str) -> bool {
        peer_id.trim() == self.own_id
    }

    fn lock_state(&self) -> MutexGuard<'_, ChatState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
