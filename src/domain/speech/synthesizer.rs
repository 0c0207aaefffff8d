use super::error::SpeechError;
use crate::infrastructure::repositories::SpeechRepository;
use std::sync::Arc;
use std::time::Duration;

const PREVIEW_CHARS: usize = 50;

/// Synthesizes one chunk of text with a local timeout.
pub struct ChunkSynthesizer {
    speech_repo: Arc<dyn SpeechRepository>,
    timeout: Duration,
}

impl ChunkSynthesizer {
    pub fn new(speech_repo: Arc<dyn SpeechRepository>, timeout: Duration) -> Self {
        Self {
            speech_repo,
            timeout,
        }
    }

    /// Single attempt, no retry.
    ///
    /// The synthesizer session is released before this returns, whichever of
    /// success, provider failure or timeout settles first.
    pub async fn synthesize_chunk(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        tracing::debug!(
            text_length = text.chars().count(),
            text_preview = %preview(text, 100),
            "Starting chunk synthesis"
        );

        let mut session = self.speech_repo.open_synthesizer().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create speech synthesizer");
            SpeechError::Dependency(format!("failed to create speech synthesizer: {}", e))
        })?;

        let outcome = tokio::time::timeout(self.timeout, session.speak_text(text)).await;
        drop(session);

        match outcome {
            Ok(Ok(audio)) => {
                tracing::debug!(audio_size = audio.len(), "Chunk synthesis successful");
                Ok(audio)
            }
            Ok(Err(failure)) => {
                tracing::error!(
                    reason = %failure.reason,
                    error_details = %failure.detail,
                    text_length = text.chars().count(),
                    text_preview = %preview(text, 100),
                    "Speech synthesis failed for chunk"
                );
                Err(SpeechError::SynthesisFailed {
                    reason: failure.reason,
                    detail: failure.detail,
                })
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    text_length = text.chars().count(),
                    "Speech synthesis timeout reached for chunk"
                );
                Err(SpeechError::SynthesisTimeout {
                    preview: preview(text, PREVIEW_CHARS),
                })
            }
        }
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
