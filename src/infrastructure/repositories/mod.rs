pub mod azure_openai_repository;
pub mod azure_search_repository;
pub mod azure_speech_repository;
pub mod llm_repository;
pub mod search_repository;
pub mod speech_repository;

pub use azure_openai_repository::AzureOpenAiRepository;
pub use azure_search_repository::AzureSearchRepository;
pub use azure_speech_repository::AzureSpeechRepository;
pub use llm_repository::LlmRepository;
pub use search_repository::SearchRepository;
pub use speech_repository::{SpeechRepository, SynthesisFailure, SynthesizerSession};
