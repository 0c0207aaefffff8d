use crate::domain::chat::{ChatMessage, Completion, CompletionOptions, LlmError};
use async_trait::async_trait;

/// Repository for chat completions.
/// Abstracts the underlying language model provider (Azure OpenAI, etc.)
#[async_trait]
pub trait LlmRepository: Send + Sync {
    /// Generate the assistant's reply to `messages`
    ///
    /// # Errors
    /// Returns a classified `LlmError` when the provider rejects or fails the call
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<Completion, LlmError>;
}
