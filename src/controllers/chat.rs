use axum::{extract::State, Extension, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    domain::chat::{
        ChatRequest, ChatResponse, ChatService, ChatServiceApi, ConversationStatusResponse,
        ResetConversationResponse, MAX_TURNS,
    },
    error::AppResult,
    infrastructure::session::SessionId,
};

pub struct ChatController {
    chat_service: Arc<ChatService>,
}

impl ChatController {
    pub fn new(chat_service: Arc<ChatService>) -> Self {
        Self { chat_service }
    }

    /// POST /api/chat - Answer a message in the session's conversation
    pub async fn send_message(
        State(controller): State<Arc<ChatController>>,
        Extension(session): Extension<SessionId>,
        Json(request): Json<ChatRequest>,
    ) -> AppResult<Json<ChatResponse>> {
        let session_id = request
            .session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(session.0);
        let message = request.message.unwrap_or_default();

        let reply = controller
            .chat_service
            .handle_message(&session_id, &message)
            .await?;

        Ok(Json(ChatResponse {
            response: reply.response,
            session_id,
            timestamp: Utc::now(),
            conversation_turn: reply.conversation_turn,
            max_turns: MAX_TURNS,
            documents_found: reply.documents_found,
            usage: reply.usage,
            training_insights: reply.training_insights,
        }))
    }

    /// POST /api/reset-conversation - Clear the session's history
    pub async fn reset_conversation(
        State(controller): State<Arc<ChatController>>,
        Extension(session): Extension<SessionId>,
    ) -> Json<ResetConversationResponse> {
        let conversation_turn = controller.chat_service.reset_conversation(&session.0).await;

        Json(ResetConversationResponse {
            message: "Conversation history reset successfully".to_string(),
            conversation_turn,
            session_id: session.0,
            timestamp: Utc::now(),
        })
    }

    /// GET /api/conversation-status - Report the session's conversation
    pub async fn conversation_status(
        State(controller): State<Arc<ChatController>>,
        Extension(session): Extension<SessionId>,
    ) -> Json<ConversationStatusResponse> {
        let status = controller.chat_service.conversation_status(&session.0).await;

        Json(ConversationStatusResponse {
            conversation_turn: status.conversation_turn,
            max_turns: MAX_TURNS,
            has_history: status.conversation_turn > 0,
            messages_in_history: status.messages_in_history,
            session_id: session.0,
            created_at: status.created_at,
            last_activity: status.last_activity,
        })
    }
}
