use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::chat::{ChatService, ChatServiceApi};

/// Response for GET /api/health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub services: ServicesHealth,
    pub version: String,
    /// Seconds since the server started
    pub uptime: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServicesHealth {
    pub openai: String,
    pub search: String,
    pub speech: String,
}

pub struct HealthController {
    chat_service: Arc<ChatService>,
    speech_configured: bool,
    started_at: Instant,
}

impl HealthController {
    pub fn new(chat_service: Arc<ChatService>, speech_configured: bool) -> Self {
        Self {
            chat_service,
            speech_configured,
            started_at: Instant::now(),
        }
    }

    /// GET /health - Liveness
    pub async fn health() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// GET /api/health - Live check of the upstream services
    pub async fn api_health(
        State(controller): State<Arc<HealthController>>,
    ) -> (StatusCode, Json<HealthResponse>) {
        let dependencies = controller.chat_service.check_dependencies().await;
        let healthy = dependencies.llm && dependencies.search;

        let connection = |ok: bool| if ok { "connected" } else { "error" }.to_string();
        let response = HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: Utc::now(),
            services: ServicesHealth {
                openai: connection(dependencies.llm),
                search: connection(dependencies.search),
                speech: if controller.speech_configured {
                    "configured"
                } else {
                    "not_configured"
                }
                .to_string(),
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime: controller.started_at.elapsed().as_secs_f64(),
        };

        let status = if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(response))
    }
}
