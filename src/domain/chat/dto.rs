use super::model::TokenUsage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request for POST /api/chat
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Overrides the cookie session when present
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response for POST /api/chat
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "conversationTurn")]
    pub conversation_turn: usize,
    #[serde(rename = "maxTurns")]
    pub max_turns: usize,
    #[serde(rename = "documentsFound")]
    pub documents_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    pub training_insights: TrainingInsights,
}

/// How the search results shaped an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingInsights {
    pub documents_used: usize,
    pub search_query: String,
    pub context_length: usize,
    /// Mean search score of the documents used, 0 when there were none
    pub relevance_score: f64,
    pub sources: Vec<String>,
}

/// Response for POST /api/reset-conversation
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetConversationResponse {
    pub message: String,
    #[serde(rename = "conversationTurn")]
    pub conversation_turn: usize,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Response for GET /api/conversation-status
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationStatusResponse {
    #[serde(rename = "conversationTurn")]
    pub conversation_turn: usize,
    #[serde(rename = "maxTurns")]
    pub max_turns: usize,
    #[serde(rename = "hasHistory")]
    pub has_history: bool,
    #[serde(rename = "messagesInHistory")]
    pub messages_in_history: usize,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}
