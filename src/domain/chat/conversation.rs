use super::model::{ChatHistoryItem, ChatMessage};
use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const MAX_TURNS: usize = 50;
/// History messages replayed to the model on each turn
pub const MAX_MESSAGES_IN_CONTEXT: usize = 20;

const SESSION_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_SESSIONS: u64 = 10_000;

/// One session's chat history.
#[derive(Debug, Clone)]
pub struct Conversation {
    history: Vec<ChatHistoryItem>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Default for Conversation {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            history: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }
}

impl Conversation {
    /// Append a user/assistant exchange and return the new turn number.
    ///
    /// Past `MAX_TURNS` exchanges the oldest messages are dropped so that
    /// `MAX_TURNS - 1` exchanges remain.
    pub fn record_exchange(&mut self, user_message: &str, assistant_response: &str) -> usize {
        let now = Utc::now();
        self.history.push(ChatHistoryItem {
            message: ChatMessage::user(user_message),
            timestamp: now,
        });
        self.history.push(ChatHistoryItem {
            message: ChatMessage::assistant(assistant_response),
            timestamp: now,
        });

        if self.history.len() > MAX_TURNS * 2 {
            let keep = MAX_TURNS * 2 - 2;
            self.history.drain(..self.history.len() - keep);
        }

        self.last_activity = now;
        self.current_turn()
    }

    /// The most recent messages, oldest first, without timestamps.
    pub fn recent_messages(&self, limit: usize) -> Vec<ChatMessage> {
        let start = self.history.len().saturating_sub(limit);
        self.history[start..]
            .iter()
            .map(|item| item.message.clone())
            .collect()
    }

    pub fn current_turn(&self) -> usize {
        self.history.len() / 2
    }

    pub fn messages_in_history(&self) -> usize {
        self.history.len()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }
}

/// In-memory conversations keyed by session id.
///
/// Entries expire after a day without access.
#[derive(Clone)]
pub struct ConversationStore {
    cache: Cache<String, Arc<Mutex<Conversation>>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(SESSION_IDLE_TTL)
            .build();
        Self { cache }
    }

    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Conversation>> {
        self.cache
            .get_with(session_id.to_string(), async {
                tracing::info!(session_id = %session_id, "New conversation started");
                Arc::new(Mutex::new(Conversation::default()))
            })
            .await
    }
}
