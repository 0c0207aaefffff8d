use crate::error::AppError;

/// Language model failures, worded for the end user.
///
/// The provider's own message is kept in the variant for logs but never shown.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("Service temporarily busy. Please wait a moment and try again.")]
    Busy(String),

    #[error("Your message was filtered. Please rephrase your question.")]
    ContentFiltered(String),

    #[error("Invalid request. Please check your message and try again.")]
    InvalidRequest(String),

    #[error("AI service temporarily unavailable. Please try again later.")]
    Unavailable(String),
}

impl LlmError {
    /// Classify a provider error by HTTP status and error code or type.
    pub fn classify(status: Option<u16>, code: Option<&str>, detail: String) -> Self {
        match (status, code) {
            (Some(429), _) | (_, Some("quota_exceeded" | "rate_limit_exceeded" | "429")) => {
                LlmError::Busy(detail)
            }
            (_, Some("content_filter")) => LlmError::ContentFiltered(detail),
            (_, Some("invalid_request_error")) => LlmError::InvalidRequest(detail),
            _ => LlmError::Unavailable(detail),
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            LlmError::Busy(detail)
            | LlmError::ContentFiltered(detail)
            | LlmError::InvalidRequest(detail)
            | LlmError::Unavailable(detail) => detail,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl From<ChatServiceError> for AppError {
    fn from(err: ChatServiceError) -> Self {
        match err {
            ChatServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ChatServiceError::Llm(e @ LlmError::Busy(_)) => AppError::RateLimitExceeded(e.to_string()),
            ChatServiceError::Llm(e @ (LlmError::ContentFiltered(_) | LlmError::InvalidRequest(_))) => {
                AppError::BadRequest(e.to_string())
            }
            ChatServiceError::Llm(e @ LlmError::Unavailable(_)) => {
                AppError::ExternalService(e.to_string())
            }
        }
    }
}
