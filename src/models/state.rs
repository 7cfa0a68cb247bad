use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, Entity, FilterCriteria};

/// Search lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Loading,
    Error,
}

impl Default for SearchStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Observable search state. The UI reads snapshots of this; all
/// transitions are driven by the search controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchState {
    pub criteria: FilterCriteria,
    #[serde(rename = "lastAppliedKey")]
    pub last_applied_key: Option<String>,
    pub results: Vec<Entity>,
    pub status: SearchStatus,
    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,
    /// Informational message for a successful search with zero results.
    #[serde(rename = "infoMessage")]
    pub info_message: Option<String>,
    /// Display field: the city the current results are for.
    #[serde(rename = "currentCity")]
    pub current_city: String,
}

/// Chat lifecycle status.
///
/// `SelfConversation` is a distinct user-facing condition, not an error:
/// the peer is the acting user and no load or send is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Idle,
    Loading,
    Error,
    SelfConversation,
}

impl Default for ChatStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Observable chat state for one conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatState {
    #[serde(rename = "peerId")]
    pub peer_id: String,
    pub messages: Vec<ChatMessage>,
    pub status: ChatStatus,
    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,
}
