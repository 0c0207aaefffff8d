use async_trait::async_trait;
use staffchat_backend::domain::chat::{
    ChatMessage, Completion, CompletionOptions, LlmError, SearchDocument, TokenUsage,
};
use staffchat_backend::domain::speech::wav::WavFormat;
use staffchat_backend::domain::speech::{AudioFormat, Recognition, VoiceInfo};
use staffchat_backend::infrastructure::audio::AudioConverter;
use staffchat_backend::infrastructure::repositories::{
    LlmRepository, SearchRepository, SpeechRepository, SynthesisFailure, SynthesizerSession,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ASSISTANT_REPLY: &str = "Check the temperature log before every shift.";

pub struct FakeLlm {
    error: Option<LlmError>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeLlm {
    pub fn replying() -> Self {
        Self {
            error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self {
            error: Some(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmRepository for FakeLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: CompletionOptions,
    ) -> Result<Completion, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        Ok(Completion {
            content: ASSISTANT_REPLY.to_string(),
            usage: Some(TokenUsage {
                prompt_tokens: 120,
                completion_tokens: 12,
                total_tokens: 132,
            }),
        })
    }
}

pub struct FakeSearch {
    documents: Option<Vec<SearchDocument>>,
}

impl FakeSearch {
    pub fn with_training_documents() -> Self {
        Self {
            documents: Some(vec![
                SearchDocument {
                    title: "Food Safety".to_string(),
                    content: "Fridges stay below 5 degrees.".to_string(),
                    score: 3.0,
                },
                SearchDocument {
                    title: "Opening Checklist".to_string(),
                    content: "Log fridge temperatures at opening.".to_string(),
                    score: 1.0,
                },
            ]),
        }
    }

    pub fn failing() -> Self {
        Self { documents: None }
    }
}

#[async_trait]
impl SearchRepository for FakeSearch {
    async fn search(&self, _query: &str, top: usize) -> Result<Vec<SearchDocument>, String> {
        match &self.documents {
            Some(documents) => Ok(documents.iter().take(top).cloned().collect()),
            None => Err("search returned HTTP 503 Service Unavailable".to_string()),
        }
    }
}

/// Speech provider whose audio is the spoken text's bytes wrapped in a WAV header.
#[derive(Default)]
pub struct FakeSpeech {
    fail_on: Option<String>,
    stall_on: Option<String>,
    spoken: Arc<Mutex<Vec<String>>>,
}

impl FakeSpeech {
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    /// Never finish synthesizing any chunk containing `marker`.
    pub fn stalling_on(marker: &str) -> Self {
        Self {
            stall_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn audio_for(text: &str) -> Vec<u8> {
        let mut payload = text.as_bytes().to_vec();
        if payload.len() % 2 == 1 {
            payload.push(0);
        }
        let mut wav = WavFormat::PCM_16KHZ_MONO
            .header(payload.len() as u32)
            .to_vec();
        wav.extend_from_slice(&payload);
        wav
    }
}

struct FakeSynthesizer {
    fail_on: Option<String>,
    stall_on: Option<String>,
    spoken: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SynthesizerSession for FakeSynthesizer {
    async fn speak_text(&mut self, text: &str) -> Result<Vec<u8>, SynthesisFailure> {
        self.spoken.lock().unwrap().push(text.to_string());

        if matches!(&self.stall_on, Some(marker) if text.contains(marker.as_str())) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        if matches!(&self.fail_on, Some(marker) if text.contains(marker.as_str())) {
            return Err(SynthesisFailure {
                reason: "Canceled".to_string(),
                detail: "voice quota exceeded".to_string(),
            });
        }

        Ok(FakeSpeech::audio_for(text))
    }
}

#[async_trait]
impl SpeechRepository for FakeSpeech {
    async fn open_synthesizer(&self) -> Result<Box<dyn SynthesizerSession>, String> {
        Ok(Box::new(FakeSynthesizer {
            fail_on: self.fail_on.clone(),
            stall_on: self.stall_on.clone(),
            spoken: self.spoken.clone(),
        }))
    }

    async fn recognize(&self, _wav: &[u8]) -> Result<Recognition, String> {
        Ok(Recognition::Recognized("Where do I log the fridge temperature?".to_string()))
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, String> {
        let voice = |name: &str, locale: &str| VoiceInfo {
            name: name.to_string(),
            display_name: name.to_string(),
            locale: locale.to_string(),
            gender: "Female".to_string(),
        };
        Ok(vec![
            voice("en-US-AriaNeural", "en-US"),
            voice("fr-FR-DeniseNeural", "fr-FR"),
            voice("en-AU-NatashaNeural", "en-AU"),
        ])
    }
}

/// Converter that treats any upload as already transcoded.
pub struct FakeConverter;

#[async_trait]
impl AudioConverter for FakeConverter {
    async fn convert_to_wav(&self, audio: &[u8], _format: AudioFormat) -> Result<Vec<u8>, String> {
        Ok(FakeSpeech::audio_for(&String::from_utf8_lossy(audio)))
    }
}
