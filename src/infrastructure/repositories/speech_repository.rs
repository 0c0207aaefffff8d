use crate::domain::speech::{Recognition, VoiceInfo};
use async_trait::async_trait;

/// A completed synthesis that the provider reported as unsuccessful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisFailure {
    pub reason: String,
    pub detail: String,
}

/// One open synthesizer on the provider side.
///
/// Sessions hold provider resources for as long as they are alive; dropping the
/// session releases them. Callers must not keep a session past the request that
/// opened it.
#[async_trait]
pub trait SynthesizerSession: Send {
    /// Synthesize `text` with the configured voice.
    ///
    /// Returns a complete WAV buffer (mono, 16-bit PCM, 16 kHz) on success.
    async fn speak_text(&mut self, text: &str) -> Result<Vec<u8>, SynthesisFailure>;
}

/// Repository for speech operations.
/// Abstracts the underlying speech provider (Azure Speech, a local engine, etc.)
///
/// Implementations do not split or merge text: they get one chunk at a time and
/// the speech service decides how to chunk and stitch.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Open a synthesizer session
    ///
    /// # Errors
    /// Returns error if the provider cannot allocate a synthesizer
    async fn open_synthesizer(&self) -> Result<Box<dyn SynthesizerSession>, String>;

    /// Recognize a single utterance from a 16 kHz mono 16-bit WAV buffer
    ///
    /// Silence or unintelligible audio is `Recognition::NoMatch`, not an error.
    async fn recognize(&self, wav: &[u8]) -> Result<Recognition, String>;

    /// List every voice the provider offers
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, String>;
}
