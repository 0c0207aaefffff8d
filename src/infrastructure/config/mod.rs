use crate::domain::speech::SpeechPipelineConfig;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub cors_origin: String,
    // Azure OpenAI
    pub azure_openai_api_key: String,
    pub azure_openai_endpoint: String,
    pub azure_openai_deployment: String,
    pub azure_openai_api_version: String,
    // Azure AI Search
    pub azure_search_endpoint: String,
    pub azure_search_index: String,
    pub azure_search_key: String,
    // Azure Speech, optional: speech endpoints answer 503 without it
    pub azure_speech_key: Option<String>,
    pub azure_speech_region: Option<String>,
    pub speech_voice_name: String,
    pub speech_recognition_language: String,
    // Text-to-speech pipeline
    pub tts_direct_threshold: usize,
    pub tts_chunk_size: usize,
    pub tts_chunk_timeout_secs: u64,
    pub tts_request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Key and region for the Azure Speech REST endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechCredentials {
    pub key: String,
    pub region: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            azure_openai_api_key: required("AZURE_API_KEY")?,
            azure_openai_endpoint: required("ENDPOINT_URL")?,
            azure_openai_deployment: required("DEPLOYMENT_NAME")?,
            azure_openai_api_version: env::var("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|_| "2024-06-01".to_string()),
            azure_search_endpoint: required("AZURE_AI_SEARCH_ENDPOINT")?,
            azure_search_index: required("AZURE_AI_SEARCH_INDEX")?,
            azure_search_key: required("AZURE_AI_SEARCH_KEY")?,
            azure_speech_key: optional("AZURE_SPEECH_KEY"),
            azure_speech_region: optional("AZURE_SPEECH_REGION"),
            speech_voice_name: env::var("SPEECH_VOICE_NAME")
                .unwrap_or_else(|_| "en-US-AriaNeural".to_string()),
            speech_recognition_language: env::var("SPEECH_RECOGNITION_LANGUAGE")
                .unwrap_or_else(|_| "en-US".to_string()),
            tts_direct_threshold: env::var("TTS_DIRECT_THRESHOLD")
                .unwrap_or_else(|_| "800".to_string())
                .parse()?,
            tts_chunk_size: env::var("TTS_CHUNK_SIZE")
                .unwrap_or_else(|_| "600".to_string())
                .parse()?,
            tts_chunk_timeout_secs: env::var("TTS_CHUNK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,
            tts_request_timeout_secs: env::var("TTS_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
        };

        Ok(config)
    }

    /// Both the speech key and region, or `None` if either is missing.
    pub fn speech_credentials(&self) -> Option<SpeechCredentials> {
        match (&self.azure_speech_key, &self.azure_speech_region) {
            (Some(key), Some(region)) => Some(SpeechCredentials {
                key: key.clone(),
                region: region.clone(),
            }),
            _ => None,
        }
    }

    pub fn speech_pipeline(&self) -> SpeechPipelineConfig {
        SpeechPipelineConfig {
            direct_threshold: self.tts_direct_threshold,
            chunk_size: self.tts_chunk_size,
            chunk_timeout: Duration::from_secs(self.tts_chunk_timeout_secs),
            request_timeout: Duration::from_secs(self.tts_request_timeout_secs),
        }
    }
}

fn required(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    env::var(name).map_err(|_| format!("missing required environment variable {}", name).into())
}

/// Unset and blank values both count as missing.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
