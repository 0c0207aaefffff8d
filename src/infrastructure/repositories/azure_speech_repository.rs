use super::speech_repository::{SpeechRepository, SynthesisFailure, SynthesizerSession};
use crate::domain::speech::{Recognition, VoiceInfo};
use crate::infrastructure::config::SpeechCredentials;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use uuid::Uuid;

const OUTPUT_FORMAT: &str = "riff-16khz-16bit-mono-pcm";
const RECOGNITION_CONTENT_TYPE: &str = "audio/wav; codecs=audio/pcm; samplerate=16000";
const USER_AGENT: &str = "staffchat-backend";

/// Azure Speech implementation of the speech repository, over the REST API.
pub struct AzureSpeechRepository {
    http: reqwest::Client,
    key: String,
    region: String,
    voice_name: String,
    language: String,
}

impl AzureSpeechRepository {
    pub fn new(credentials: SpeechCredentials, voice_name: String, language: String) -> Self {
        tracing::info!(
            region = %credentials.region,
            voice = %voice_name,
            "Azure Speech repository configured"
        );
        Self {
            http: reqwest::Client::new(),
            key: credentials.key,
            region: credentials.region,
            voice_name,
            language,
        }
    }

    fn tts_base(&self) -> String {
        format!("https://{}.tts.speech.microsoft.com/cognitiveservices", self.region)
    }
}

#[async_trait]
impl SpeechRepository for AzureSpeechRepository {
    async fn open_synthesizer(&self) -> Result<Box<dyn SynthesizerSession>, String> {
        let session = AzureSynthesizerSession {
            id: Uuid::new_v4(),
            http: self.http.clone(),
            url: format!("{}/v1", self.tts_base()),
            key: self.key.clone(),
            voice_name: self.voice_name.clone(),
            language: self.language.clone(),
        };
        tracing::debug!(synthesizer_id = %session.id, "Speech synthesizer opened");
        Ok(Box::new(session))
    }

    async fn recognize(&self, wav: &[u8]) -> Result<Recognition, String> {
        let start = Instant::now();
        let url = format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
            self.region
        );

        let response = self
            .http
            .post(url)
            .query(&[("language", self.language.as_str()), ("format", "simple")])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header(reqwest::header::CONTENT_TYPE, RECOGNITION_CONTENT_TYPE)
            .header(reqwest::header::ACCEPT, "application/json")
            .body(wav.to_vec())
            .send()
            .await
            .map_err(|e| format!("speech recognition request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read recognition response: {}", e))?;
        if !status.is_success() {
            return Err(format!("speech recognition returned HTTP {}: {}", status, body));
        }

        let recognition = parse_recognition(&body)?;
        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            matched = matches!(recognition, Recognition::Recognized(_)),
            "Speech recognition completed"
        );
        Ok(recognition)
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, String> {
        let response = self
            .http
            .get(format!("{}/voices/list", self.tts_base()))
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .send()
            .await
            .map_err(|e| format!("voice list request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("voice list returned HTTP {}", status));
        }

        let voices: Vec<AzureVoice> = response
            .json()
            .await
            .map_err(|e| format!("failed to parse voice list: {}", e))?;

        Ok(voices.into_iter().map(VoiceInfo::from).collect())
    }
}

/// One synthesis session over the REST endpoint.
///
/// Requests go through a clone of the repository's pooled `reqwest::Client`, so
/// the session owns no connection. Dropping it only closes the session in the
/// logs; an in-flight request is cancelled when its future is dropped.
struct AzureSynthesizerSession {
    id: Uuid,
    http: reqwest::Client,
    url: String,
    key: String,
    voice_name: String,
    language: String,
}

impl Drop for AzureSynthesizerSession {
    fn drop(&mut self) {
        tracing::debug!(synthesizer_id = %self.id, "Speech synthesizer closed");
    }
}

#[async_trait]
impl SynthesizerSession for AzureSynthesizerSession {
    async fn speak_text(&mut self, text: &str) -> Result<Vec<u8>, SynthesisFailure> {
        let start = Instant::now();

        let response = self
            .http
            .post(&self.url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .body(build_ssml(text, &self.voice_name, &self.language))
            .send()
            .await
            .map_err(|e| SynthesisFailure {
                reason: "Error".to_string(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SynthesisFailure {
                reason: "Canceled".to_string(),
                detail: format!("HTTP {}: {}", status, detail),
            });
        }

        let audio = response.bytes().await.map_err(|e| SynthesisFailure {
            reason: "Error".to_string(),
            detail: format!("failed to read audio: {}", e),
        })?;

        tracing::debug!(
            synthesizer_id = %self.id,
            audio_size = audio.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Azure Speech synthesis completed"
        );

        Ok(audio.to_vec())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureVoice {
    short_name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    locale: String,
    #[serde(default)]
    gender: String,
}

impl From<AzureVoice> for VoiceInfo {
    fn from(voice: AzureVoice) -> Self {
        Self {
            name: voice.short_name,
            display_name: voice.display_name,
            locale: voice.locale,
            gender: voice.gender,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SimpleRecognitionResult {
    recognition_status: String,
    #[serde(default)]
    display_text: String,
}

fn parse_recognition(body: &str) -> Result<Recognition, String> {
    let result: SimpleRecognitionResult = serde_json::from_str(body)
        .map_err(|e| format!("failed to parse recognition response: {}", e))?;

    match result.recognition_status.as_str() {
        "Success" => Ok(Recognition::Recognized(result.display_text)),
        "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => Ok(Recognition::NoMatch),
        other => Err(format!("speech recognition failed with status {}", other)),
    }
}

fn build_ssml(text: &str, voice_name: &str, language: &str) -> String {
    format!(
        "<speak version='1.0' xml:lang='{}'><voice name='{}'>{}</voice></speak>",
        escape_xml(language),
        escape_xml(voice_name),
        escape_xml(text)
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
