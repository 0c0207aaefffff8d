pub mod audio_format;
pub mod dto;
pub mod error;
pub mod normalizer;
pub mod service;
pub mod splitter;
pub mod synthesizer;
pub mod wav;


pub use audio_format::{detect_audio_format, AudioFormat};
pub use dto::{
    Recognition, SpeechToTextResponse, TextToSpeechRequest, Transcription, VoiceInfo,
    VoicesResponse,
};
pub use error::SpeechError;
pub use service::{SpeechPipelineConfig, SpeechService, SpeechServiceApi};
