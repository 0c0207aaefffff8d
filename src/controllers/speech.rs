use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::speech::{
        SpeechError, SpeechService, SpeechServiceApi, SpeechToTextResponse, TextToSpeechRequest,
        VoicesResponse,
    },
    error::{AppError, AppResult},
    infrastructure::session::SessionId,
};

/// Upload limit for recordings sent to speech-to-text
pub const MAX_AUDIO_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct SpeechController {
    speech_service: Arc<SpeechService>,
}

impl SpeechController {
    pub fn new(speech_service: Arc<SpeechService>) -> Self {
        Self { speech_service }
    }

    /// POST /api/speech/text-to-speech - Convert text to a WAV recording
    #[tracing::instrument(skip_all, fields(session_id = %session.0))]
    pub async fn text_to_speech(
        State(controller): State<Arc<SpeechController>>,
        Extension(session): Extension<SessionId>,
        Json(request): Json<TextToSpeechRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let text = request.text().ok_or_else(|| {
            AppError::BadRequest("Text is required and must be a string".to_string())
        })?;

        let request_timeout = controller.speech_service.request_timeout();
        let audio = match tokio::time::timeout(
            request_timeout,
            controller.speech_service.text_to_speech(text),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(SpeechError::RequestTimeout(request_timeout).into()),
        };

        tracing::info!(audio_size = audio.len(), "Text-to-speech completed");

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/wav"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(audio.len()));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        Ok((StatusCode::OK, headers, Body::from(audio)))
    }

    /// POST /api/speech/speech-to-text - Transcribe an uploaded recording
    #[tracing::instrument(skip_all, fields(session_id = %session.0))]
    pub async fn speech_to_text(
        State(controller): State<Arc<SpeechController>>,
        Extension(session): Extension<SessionId>,
        mut multipart: Multipart,
    ) -> AppResult<Json<SpeechToTextResponse>> {
        let mut audio = None;
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() == Some("audio") {
                audio = Some(field.bytes().await.map_err(multipart_error)?);
                break;
            }
        }

        let audio = audio
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| AppError::BadRequest("Audio file is required".to_string()))?;

        let transcription = controller
            .speech_service
            .speech_to_text(audio.to_vec())
            .await?;

        Ok(Json(SpeechToTextResponse {
            text: transcription.text,
            success: true,
            audio_format: transcription.audio_format,
            converted: transcription.converted,
        }))
    }

    /// GET /api/speech/voices - List English voices
    pub async fn voices(
        State(controller): State<Arc<SpeechController>>,
    ) -> AppResult<Json<VoicesResponse>> {
        let voices = controller.speech_service.english_voices().await?;
        Ok(Json(VoicesResponse {
            voices,
            success: true,
        }))
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Audio file must be {}MB or less",
            MAX_AUDIO_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::BadRequest(err.body_text())
    }
}
