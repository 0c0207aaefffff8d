pub mod ffmpeg;

pub use ffmpeg::FfmpegAudioConverter;

use crate::domain::speech::AudioFormat;
use async_trait::async_trait;

/// Converts uploaded recordings into the WAV layout speech recognition expects.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    /// Transcode `audio` to 16 kHz mono 16-bit PCM WAV
    ///
    /// `format` is the detected container and may be `AudioFormat::Unknown`.
    async fn convert_to_wav(&self, audio: &[u8], format: AudioFormat) -> Result<Vec<u8>, String>;
}
