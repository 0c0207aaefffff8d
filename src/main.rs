use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use staffchat_backend::controllers::{
    chat::ChatController, health::HealthController, speech::SpeechController,
};
use staffchat_backend::domain::{chat::ChatService, speech::SpeechService};
use staffchat_backend::infrastructure::audio::FfmpegAudioConverter;
use staffchat_backend::infrastructure::config::{Config, LogFormat};
use staffchat_backend::infrastructure::http::start_http_server;
use staffchat_backend::infrastructure::repositories::{
    AzureOpenAiRepository, AzureSearchRepository, AzureSpeechRepository, SpeechRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting staff training assistant on {}:{}",
        config.host,
        config.port
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let openai_client = Arc::new(AzureOpenAiRepository::client(
        &config.azure_openai_endpoint,
        &config.azure_openai_api_key,
        &config.azure_openai_deployment,
        &config.azure_openai_api_version,
    ));
    let llm_repo = Arc::new(AzureOpenAiRepository::new(
        openai_client,
        config.azure_openai_deployment.clone(),
    ));
    let search_repo = Arc::new(AzureSearchRepository::new(
        config.azure_search_endpoint.clone(),
        config.azure_search_index.clone(),
        config.azure_search_key.clone(),
    ));
    let speech_repo: Option<Arc<dyn SpeechRepository>> = match config.speech_credentials() {
        Some(credentials) => Some(Arc::new(AzureSpeechRepository::new(
            credentials,
            config.speech_voice_name.clone(),
            config.speech_recognition_language.clone(),
        ))),
        None => {
            tracing::warn!(
                "AZURE_SPEECH_KEY or AZURE_SPEECH_REGION not set, speech endpoints will answer 503"
            );
            None
        }
    };
    let speech_configured = speech_repo.is_some();

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let chat_service = Arc::new(ChatService::new(llm_repo, search_repo));
    let speech_service = Arc::new(SpeechService::new(
        speech_repo,
        Arc::new(FfmpegAudioConverter::default()),
        config.speech_pipeline(),
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let chat_controller = Arc::new(ChatController::new(chat_service.clone()));
    let speech_controller = Arc::new(SpeechController::new(speech_service));
    let health_controller = Arc::new(HealthController::new(chat_service, speech_configured));

    // Start HTTP server with all routes
    start_http_server(
        Arc::new(config),
        chat_controller,
        speech_controller,
        health_controller,
    )
    .await
    .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "staffchat_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
