use serde::{Deserialize, Serialize};

/// Container formats a browser recorder is likely to upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Webm,
    Ogg,
    Mp3,
    Mp4,
    Unknown,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Webm => "webm",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Mp4 => "mp4",
            AudioFormat::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sniff the container format from the leading magic bytes.
pub fn detect_audio_format(bytes: &[u8]) -> AudioFormat {
    let header = &bytes[..bytes.len().min(12)];

    if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        AudioFormat::Webm
    } else if header.starts_with(b"RIFF") && header.len() >= 12 && &header[8..12] == b"WAVE" {
        AudioFormat::Wav
    } else if header.starts_with(b"ID3")
        || header.starts_with(&[0xFF, 0xFB])
        || header.starts_with(&[0xFF, 0xF3])
    {
        AudioFormat::Mp3
    } else if header.starts_with(b"OggS") {
        AudioFormat::Ogg
    } else if header.len() >= 8 && &header[4..8] == b"ftyp" {
        AudioFormat::Mp4
    } else {
        AudioFormat::Unknown
    }
}
