use super::audio_format::AudioFormat;
use serde::{Deserialize, Serialize};

/// Request for POST /api/speech/text-to-speech
///
/// `text` stays untyped so a non-string value gets our own 400 instead of a
/// deserialization rejection.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextToSpeechRequest {
    #[serde(default)]
    pub text: Option<serde_json::Value>,
}

impl TextToSpeechRequest {
    pub fn text(&self) -> Option<&str> {
        self.text.as_ref().and_then(|v| v.as_str())
    }
}

/// Response for POST /api/speech/speech-to-text
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechToTextResponse {
    pub text: String,
    pub success: bool,
    pub audio_format: AudioFormat,
    pub converted: bool,
}

/// Response for GET /api/speech/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInfo {
    pub name: String,
    pub display_name: String,
    pub locale: String,
    pub gender: String,
}

/// Outcome of recognizing one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Recognized(String),
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub text: String,
    pub audio_format: AudioFormat,
    pub converted: bool,
}
