use crate::error::AppError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("speech service is not available - configuration missing: {0}")]
    NotConfigured(String),

    #[error("speech synthesis timeout for chunk: {preview}...")]
    SynthesisTimeout { preview: String },

    #[error("speech synthesis failed ({reason}): {detail}")]
    SynthesisFailed { reason: String, detail: String },

    #[error("failed to synthesize text chunk {}: {}", .chunk_index + 1, .cause)]
    ChunkSynthesisFailed {
        chunk_index: usize,
        #[source]
        cause: Box<SpeechError>,
    },

    #[error("no audio buffers to stitch")]
    NoAudioToStitch,

    #[error("audio buffer {index} is not a 16-bit PCM WAV container: {detail}")]
    MalformedWav { index: usize, detail: String },

    #[error("audio buffer {index} has a different WAV format than the first buffer")]
    FormatMismatch { index: usize },

    #[error("text-to-speech request timed out after {}s", .0.as_secs())]
    RequestTimeout(Duration),

    #[error("speech recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("audio conversion failed: {0}")]
    ConversionFailed(String),

    #[error("speech service error: {0}")]
    Dependency(String),
}

impl SpeechError {
    /// True for the per-chunk and whole-request timeouts, including a chunk
    /// failure whose cause was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            SpeechError::SynthesisTimeout { .. } | SpeechError::RequestTimeout(_) => true,
            SpeechError::ChunkSynthesisFailed { cause, .. } => cause.is_timeout(),
            _ => false,
        }
    }
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::InvalidInput(msg) => AppError::BadRequest(msg),
            SpeechError::NotConfigured(_) => AppError::ServiceUnavailable(
                "Speech service is not available - configuration issue".to_string(),
            ),
            err if err.is_timeout() => AppError::RequestTimeout(err.to_string()),
            SpeechError::ConversionFailed(msg) => {
                AppError::Internal(format!("Failed to convert audio format: {}", msg))
            }
            SpeechError::SynthesisFailed { .. }
            | SpeechError::ChunkSynthesisFailed { .. }
            | SpeechError::RecognitionFailed(_)
            | SpeechError::Dependency(_) => AppError::ExternalService(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}
