use super::llm_repository::LlmRepository;
use crate::domain::chat::{
    ChatMessage, ChatRole, Completion, CompletionOptions, LlmError, TokenUsage,
};
use async_openai::{
    config::AzureConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Azure OpenAI implementation of the LLM repository
pub struct AzureOpenAiRepository {
    client: Arc<Client<AzureConfig>>,
    deployment: String,
}

impl AzureOpenAiRepository {
    pub fn new(client: Arc<Client<AzureConfig>>, deployment: String) -> Self {
        Self { client, deployment }
    }

    /// Build a client for one Azure OpenAI deployment.
    pub fn client(
        endpoint: &str,
        api_key: &str,
        deployment: &str,
        api_version: &str,
    ) -> Client<AzureConfig> {
        let config = AzureConfig::new()
            .with_api_base(endpoint.trim_end_matches('/'))
            .with_api_key(api_key)
            .with_deployment_id(deployment)
            .with_api_version(api_version);
        Client::with_config(config)
    }
}

#[async_trait]
impl LlmRepository for AzureOpenAiRepository {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<Completion, LlmError> {
        let start = Instant::now();

        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()
            .map_err(classify_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.deployment.as_str())
            .messages(request_messages)
            .temperature(options.temperature)
            .max_tokens(options.max_tokens)
            .top_p(options.top_p)
            .frequency_penalty(options.frequency_penalty)
            .presence_penalty(options.presence_penalty)
            .build()
            .map_err(classify_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_error)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Unavailable("completion had no content".to_string()))?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        tracing::debug!(
            deployment = %self.deployment,
            duration_ms = start.elapsed().as_millis() as u64,
            total_tokens = usage.map(|u| u.total_tokens),
            "Azure OpenAI completion received"
        );

        Ok(Completion { content, usage })
    }
}

fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.as_str();
    Ok(match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    })
}

fn classify_error(error: OpenAIError) -> LlmError {
    match error {
        OpenAIError::ApiError(api_error) => {
            let code = api_error
                .code
                .as_ref()
                .map(|c| c.to_string().trim_matches('"').to_string());
            let kind = api_error.r#type.clone();
            let code = code.or(kind);
            LlmError::classify(None, code.as_deref(), api_error.message)
        }
        OpenAIError::Reqwest(e) => {
            let status = e.status().map(|s| s.as_u16());
            LlmError::classify(status, None, e.to_string())
        }
        other => LlmError::classify(None, None, other.to_string()),
    }
}
