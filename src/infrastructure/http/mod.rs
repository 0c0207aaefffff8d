use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    chat::ChatController,
    health::HealthController,
    speech::{SpeechController, MAX_AUDIO_UPLOAD_BYTES},
};
use crate::infrastructure::config::Config;
use crate::infrastructure::session::session_middleware;

/// Build the application router with all routes and layers configured
pub fn build_router(
    chat_controller: Arc<ChatController>,
    speech_controller: Arc<SpeechController>,
    health_controller: Arc<HealthController>,
    cors_origin: HeaderValue,
) -> Router {
    // Chat routes
    let chat_routes = Router::new()
        .route("/api/chat", post(ChatController::send_message))
        .route("/api/reset-conversation", post(ChatController::reset_conversation))
        .route("/api/conversation-status", get(ChatController::conversation_status))
        .with_state(chat_controller);

    // Speech routes
    let speech_routes = Router::new()
        .route("/api/speech/text-to-speech", post(SpeechController::text_to_speech))
        .route(
            "/api/speech/speech-to-text",
            post(SpeechController::speech_to_text)
                .layer(DefaultBodyLimit::max(MAX_AUDIO_UPLOAD_BYTES)),
        )
        .route("/api/speech/voices", get(SpeechController::voices))
        .with_state(speech_controller);

    // Session-scoped API
    let api_routes = Router::new()
        .merge(chat_routes)
        .merge(speech_routes)
        .layer(middleware::from_fn(session_middleware));

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(HealthController::health))
        .route("/api/health", get(HealthController::api_health))
        .with_state(health_controller)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    chat_controller: Arc<ChatController>,
    speech_controller: Arc<SpeechController>,
    health_controller: Arc<HealthController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cors_origin = HeaderValue::from_str(&config.cors_origin)?;
    let app = build_router(chat_controller, speech_controller, health_controller, cors_origin);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
