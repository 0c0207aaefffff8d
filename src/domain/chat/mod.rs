pub mod conversation;
pub mod dto;
pub mod error;
pub mod model;
pub mod prompt;
pub mod service;


pub use conversation::{MAX_MESSAGES_IN_CONTEXT, MAX_TURNS};
pub use dto::{
    ChatRequest, ChatResponse, ConversationStatusResponse, ResetConversationResponse,
    TrainingInsights,
};
pub use error::{ChatServiceError, LlmError};
pub use model::{
    ChatMessage, ChatRole, Completion, CompletionOptions, SearchDocument, TokenUsage,
};
pub use service::{ChatReply, ChatService, ChatServiceApi, ConversationStatus, DependencyHealth};
