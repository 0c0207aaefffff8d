use super::audio_format::{detect_audio_format, AudioFormat};
use super::dto::{Recognition, Transcription, VoiceInfo};
use super::error::SpeechError;
use super::normalizer::normalize;
use super::splitter::split_normalized;
use super::synthesizer::ChunkSynthesizer;
use super::wav::stitch;
use crate::infrastructure::audio::AudioConverter;
use crate::infrastructure::repositories::SpeechRepository;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const MAX_TEXT_CHARS: usize = 5000;

/// Tunables for the text-to-speech pipeline.
#[derive(Debug, Clone, Copy)]
pub struct SpeechPipelineConfig {
    /// Normalized texts up to this many chars are synthesized in one call
    pub direct_threshold: usize,
    pub chunk_size: usize,
    pub chunk_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for SpeechPipelineConfig {
    fn default() -> Self {
        Self {
            direct_threshold: 800,
            chunk_size: 600,
            chunk_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// How a text will be sent to the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisPlan {
    Direct(String),
    Chunked(Vec<String>),
}

pub struct SpeechService {
    speech_repo: Option<Arc<dyn SpeechRepository>>,
    audio_converter: Arc<dyn AudioConverter>,
    synthesizer: Option<ChunkSynthesizer>,
    pipeline: SpeechPipelineConfig,
}

impl SpeechService {
    /// `speech_repo` is `None` when speech credentials are not configured; every
    /// operation then fails with `SpeechError::NotConfigured`.
    pub fn new(
        speech_repo: Option<Arc<dyn SpeechRepository>>,
        audio_converter: Arc<dyn AudioConverter>,
        pipeline: SpeechPipelineConfig,
    ) -> Self {
        let synthesizer = speech_repo
            .as_ref()
            .map(|repo| ChunkSynthesizer::new(repo.clone(), pipeline.chunk_timeout));

        Self {
            speech_repo,
            audio_converter,
            synthesizer,
            pipeline,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.pipeline.request_timeout
    }

    /// Normalize `text` and decide between one direct call and a chunked run.
    pub fn plan(&self, text: &str) -> Result<SynthesisPlan, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidInput(
                "Text is required and must be a string".to_string(),
            ));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(SpeechError::InvalidInput(format!(
                "Text is too long. Maximum {} characters allowed.",
                MAX_TEXT_CHARS
            )));
        }

        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(SpeechError::InvalidInput(
                "Text contains nothing that can be spoken".to_string(),
            ));
        }

        if normalized.chars().count() <= self.pipeline.direct_threshold {
            return Ok(SynthesisPlan::Direct(normalized));
        }

        let mut chunks = split_normalized(&normalized, self.pipeline.chunk_size);
        match chunks.len() {
            0 => Err(SpeechError::InvalidInput(
                "Text contains nothing that can be spoken".to_string(),
            )),
            1 => Ok(SynthesisPlan::Direct(chunks.remove(0))),
            _ => Ok(SynthesisPlan::Chunked(chunks)),
        }
    }

    fn synthesizer(&self) -> Result<&ChunkSynthesizer, SpeechError> {
        self.synthesizer
            .as_ref()
            .ok_or_else(|| SpeechError::NotConfigured("AZURE_SPEECH_KEY".to_string()))
    }

    fn repository(&self) -> Result<&Arc<dyn SpeechRepository>, SpeechError> {
        self.speech_repo
            .as_ref()
            .ok_or_else(|| SpeechError::NotConfigured("AZURE_SPEECH_KEY".to_string()))
    }

    async fn synthesize_chunks(
        &self,
        synthesizer: &ChunkSynthesizer,
        chunks: Vec<String>,
    ) -> Result<Vec<u8>, SpeechError> {
        let total_chunks = chunks.len();
        let start = Instant::now();
        let mut buffers = Vec::with_capacity(total_chunks);

        tracing::info!(total_chunks, "Text split into chunks");

        // Strictly sequential; the first failure aborts the remaining chunks.
        for (chunk_index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(
                chunk = chunk_index + 1,
                total_chunks,
                chunk_length = chunk.chars().count(),
                "Synthesizing chunk"
            );

            let audio = synthesizer.synthesize_chunk(chunk).await.map_err(|cause| {
                tracing::error!(
                    chunk = chunk_index + 1,
                    total_chunks,
                    error = %cause,
                    "Chunk synthesis failed"
                );
                SpeechError::ChunkSynthesisFailed {
                    chunk_index,
                    cause: Box::new(cause),
                }
            })?;

            tracing::info!(
                chunk = chunk_index + 1,
                total_chunks,
                audio_size = audio.len(),
                "Chunk synthesized"
            );
            buffers.push(audio);
        }

        let stitched = stitch(buffers)?;

        tracing::info!(
            total_chunks,
            final_audio_size = stitched.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Audio chunks combined"
        );

        Ok(stitched)
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Turn free text into one playable WAV buffer
    ///
    /// Text is normalized for speech first. Short texts are synthesized with a
    /// single call; longer ones are split at sentence boundaries, synthesized
    /// chunk by chunk in order and stitched together.
    async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>, SpeechError>;

    /// Transcribe one uploaded recording, converting it to WAV when needed
    async fn speech_to_text(&self, audio: Vec<u8>) -> Result<Transcription, SpeechError>;

    /// Voices with an English locale
    async fn english_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    #[tracing::instrument(skip(self, text), fields(text_length = text.chars().count()))]
    async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let synthesizer = self.synthesizer()?;

        match self.plan(text)? {
            SynthesisPlan::Direct(normalized) => {
                tracing::info!(
                    normalized_length = normalized.chars().count(),
                    "Synthesizing text directly"
                );
                synthesizer.synthesize_chunk(&normalized).await
            }
            SynthesisPlan::Chunked(chunks) => self.synthesize_chunks(synthesizer, chunks).await,
        }
    }

    #[tracing::instrument(skip(self, audio), fields(audio_size = audio.len()))]
    async fn speech_to_text(&self, audio: Vec<u8>) -> Result<Transcription, SpeechError> {
        let repo = self.repository()?;

        let audio_format = detect_audio_format(&audio);
        tracing::info!(audio_format = %audio_format, "Audio format detected");

        let (wav, converted) = if audio_format == AudioFormat::Wav {
            (audio, false)
        } else {
            let wav = self
                .audio_converter
                .convert_to_wav(&audio, audio_format)
                .await
                .map_err(SpeechError::ConversionFailed)?;
            (wav, true)
        };

        let text = match repo
            .recognize(&wav)
            .await
            .map_err(SpeechError::RecognitionFailed)?
        {
            Recognition::Recognized(text) => text,
            Recognition::NoMatch => {
                tracing::warn!("No speech could be recognized");
                String::new()
            }
        };

        Ok(Transcription {
            text,
            audio_format,
            converted,
        })
    }

    async fn english_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let voices = self
            .repository()?
            .list_voices()
            .await
            .map_err(SpeechError::Dependency)?;

        Ok(voices
            .into_iter()
            .filter(|voice| voice.locale.starts_with("en-"))
            .collect())
    }
}
