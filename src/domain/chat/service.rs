use super::conversation::{ConversationStore, MAX_MESSAGES_IN_CONTEXT};
use super::dto::TrainingInsights;
use super::error::ChatServiceError;
use super::model::{ChatMessage, CompletionOptions, SearchDocument, TokenUsage};
use super::prompt::{build_context, build_messages, build_system_prompt};
use crate::infrastructure::repositories::{LlmRepository, SearchRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const MAX_MESSAGE_CHARS: usize = 5000;
const SEARCH_TOP: usize = 5;

/// The assistant's answer to one user message.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub conversation_turn: usize,
    pub documents_found: usize,
    pub usage: Option<TokenUsage>,
    pub training_insights: TrainingInsights,
}

#[derive(Debug, Clone)]
pub struct ConversationStatus {
    pub conversation_turn: usize,
    pub messages_in_history: usize,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Liveness of the chat's upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyHealth {
    pub llm: bool,
    pub search: bool,
}

pub struct ChatService {
    llm_repo: Arc<dyn LlmRepository>,
    search_repo: Arc<dyn SearchRepository>,
    conversations: ConversationStore,
}

impl ChatService {
    pub fn new(llm_repo: Arc<dyn LlmRepository>, search_repo: Arc<dyn SearchRepository>) -> Self {
        Self {
            llm_repo,
            search_repo,
            conversations: ConversationStore::new(),
        }
    }
}

#[async_trait]
pub trait ChatServiceApi: Send + Sync {
    /// Answer a user message within its session's conversation
    ///
    /// This operation:
    /// - Searches the training index for related documents
    /// - Builds the system prompt from those documents
    /// - Replays the latest history and asks the language model
    /// - Records the exchange in the conversation
    async fn handle_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply, ChatServiceError>;

    async fn reset_conversation(&self, session_id: &str) -> usize;

    async fn conversation_status(&self, session_id: &str) -> ConversationStatus;

    /// Probe the language model and the search index with minimal requests
    async fn check_dependencies(&self) -> DependencyHealth;
}

#[async_trait]
impl ChatServiceApi for ChatService {
    #[tracing::instrument(skip(self, message), fields(session_id = %session_id))]
    async fn handle_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply, ChatServiceError> {
        validate_message(message)?;

        tracing::info!(
            message_length = message.chars().count(),
            "Processing chat request"
        );

        let documents = self.search_documents(message).await;
        let context = build_context(&documents);
        let system_prompt = build_system_prompt(&context);

        let conversation = self.conversations.get_or_create(session_id).await;
        let history = conversation
            .lock()
            .await
            .recent_messages(MAX_MESSAGES_IN_CONTEXT);
        let history_len = history.len();

        let messages = build_messages(system_prompt, history, message);
        tracing::debug!(
            total_messages = messages.len(),
            history_messages = history_len,
            "Sending messages to language model"
        );

        let completion = self
            .llm_repo
            .complete(&messages, CompletionOptions::default())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, detail = %e.detail(), "Language model call failed");
                e
            })?;

        let conversation_turn = conversation
            .lock()
            .await
            .record_exchange(message, &completion.content);

        tracing::info!(
            conversation_turn,
            documents_found = documents.len(),
            total_tokens = completion.usage.map(|u| u.total_tokens),
            "Chat response generated"
        );

        Ok(ChatReply {
            response: completion.content,
            conversation_turn,
            documents_found: documents.len(),
            usage: completion.usage,
            training_insights: training_insights(message, &context, &documents),
        })
    }

    async fn reset_conversation(&self, session_id: &str) -> usize {
        let conversation = self.conversations.get_or_create(session_id).await;
        let mut conversation = conversation.lock().await;
        conversation.reset();
        tracing::info!(session_id = %session_id, "Conversation reset");
        conversation.current_turn()
    }

    async fn conversation_status(&self, session_id: &str) -> ConversationStatus {
        let conversation = self.conversations.get_or_create(session_id).await;
        let conversation = conversation.lock().await;
        ConversationStatus {
            conversation_turn: conversation.current_turn(),
            messages_in_history: conversation.messages_in_history(),
            created_at: conversation.created_at(),
            last_activity: conversation.last_activity(),
        }
    }

    async fn check_dependencies(&self) -> DependencyHealth {
        let probe = [ChatMessage::user("health check")];
        let (llm, search) = tokio::join!(
            self.llm_repo.complete(&probe, CompletionOptions::probe()),
            self.search_repo.search("health check", 1),
        );

        if let Err(e) = &llm {
            tracing::warn!(error = %e.detail(), "Language model health check failed");
        }
        if let Err(e) = &search {
            tracing::warn!(error = %e, "Search health check failed");
        }

        DependencyHealth {
            llm: llm.is_ok(),
            search: search.is_ok(),
        }
    }
}

impl ChatService {
    /// Search failures degrade to an answer without training context.
    async fn search_documents(&self, query: &str) -> Vec<SearchDocument> {
        match self.search_repo.search(query, SEARCH_TOP).await {
            Ok(documents) => {
                tracing::info!(documents_found = documents.len(), "Training documents found");
                documents
            }
            Err(e) => {
                tracing::warn!(error = %e, "Search failed, continuing without documents");
                Vec::new()
            }
        }
    }
}

fn validate_message(message: &str) -> Result<(), ChatServiceError> {
    if message.trim().is_empty() {
        return Err(ChatServiceError::Invalid("Message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatServiceError::Invalid(format!(
            "Message too long (max {} characters)",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(())
}

fn training_insights(query: &str, context: &str, documents: &[SearchDocument]) -> TrainingInsights {
    let relevance_score = if documents.is_empty() {
        0.0
    } else {
        documents.iter().map(|d| d.score).sum::<f64>() / documents.len() as f64
    };

    TrainingInsights {
        documents_used: documents.len(),
        search_query: query.to_string(),
        context_length: context.chars().count(),
        relevance_score,
        sources: documents
            .iter()
            .filter(|d| !d.title.is_empty())
            .map(|d| d.title.clone())
            .collect(),
    }
}
