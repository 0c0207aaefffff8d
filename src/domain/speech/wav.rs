//! Minimal handling of canonical 44-byte-header PCM WAV buffers.
//!
//! The synthesizer is asked for `riff-16khz-16bit-mono-pcm`, which always comes
//! back as RIFF/WAVE with a single `fmt ` chunk followed directly by `data`.
//! That fixed layout is what lets chunks be joined by rewriting two size fields.

use super::error::SpeechError;

pub const WAV_HEADER_LEN: usize = 44;

const RIFF_SIZE_OFFSET: usize = 4;
const DATA_SIZE_OFFSET: usize = 40;

/// Format parameters carried in the `fmt ` chunk of a WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// The format requested from the speech service.
    pub const PCM_16KHZ_MONO: WavFormat = WavFormat {
        audio_format: 1,
        channels: 1,
        sample_rate: 16_000,
        byte_rate: 32_000,
        block_align: 2,
        bits_per_sample: 16,
    };

    /// Read the format from a canonical WAV header.
    pub fn parse(buffer: &[u8]) -> Result<Self, String> {
        if buffer.len() < WAV_HEADER_LEN {
            return Err(format!(
                "buffer is {} bytes, shorter than the {}-byte header",
                buffer.len(),
                WAV_HEADER_LEN
            ));
        }
        if &buffer[0..4] != b"RIFF" || &buffer[8..12] != b"WAVE" {
            return Err("missing RIFF/WAVE signature".to_string());
        }

        Ok(Self {
            audio_format: read_u16_le(buffer, 20),
            channels: read_u16_le(buffer, 22),
            sample_rate: read_u32_le(buffer, 24),
            byte_rate: read_u32_le(buffer, 28),
            block_align: read_u16_le(buffer, 32),
            bits_per_sample: read_u16_le(buffer, 34),
        })
    }

    /// Build a canonical header describing `data_len` bytes of samples.
    pub fn header(&self, data_len: u32) -> [u8; WAV_HEADER_LEN] {
        let mut header = [0u8; WAV_HEADER_LEN];
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&(WAV_HEADER_LEN as u32 - 8 + data_len).to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes());
        header[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&data_len.to_le_bytes());
        header
    }
}

/// Join WAV buffers into a single playable WAV buffer.
///
/// The first buffer's header is reused with its RIFF size (offset 4) and data
/// size (offset 40) rewritten for the combined payload. Every buffer must share
/// the first buffer's format; a mismatch is rejected rather than producing a
/// header that lies about half of the samples.
///
/// A single buffer is returned untouched.
pub fn stitch(mut buffers: Vec<Vec<u8>>) -> Result<Vec<u8>, SpeechError> {
    match buffers.len() {
        0 => return Err(SpeechError::NoAudioToStitch),
        1 => return Ok(buffers.remove(0)),
        _ => {}
    }

    let template = WavFormat::parse(&buffers[0])
        .map_err(|detail| SpeechError::MalformedWav { index: 0, detail })?;

    for (index, buffer) in buffers.iter().enumerate().skip(1) {
        let format = WavFormat::parse(buffer)
            .map_err(|detail| SpeechError::MalformedWav { index, detail })?;
        if format != template {
            return Err(SpeechError::FormatMismatch { index });
        }
    }

    let payload_len: usize = buffers.iter().map(|b| b.len() - WAV_HEADER_LEN).sum();
    let riff_size =
        u32::try_from(payload_len + WAV_HEADER_LEN - 8).map_err(|_| SpeechError::MalformedWav {
            index: 0,
            detail: format!("combined payload of {} bytes exceeds the WAV size limit", payload_len),
        })?;

    let mut stitched = Vec::with_capacity(WAV_HEADER_LEN + payload_len);
    stitched.extend_from_slice(&buffers[0][..WAV_HEADER_LEN]);
    write_u32_le(&mut stitched, RIFF_SIZE_OFFSET, riff_size);
    write_u32_le(&mut stitched, DATA_SIZE_OFFSET, payload_len as u32);

    for buffer in &buffers {
        stitched.extend_from_slice(&buffer[WAV_HEADER_LEN..]);
    }

    tracing::debug!(
        buffer_count = buffers.len(),
        payload_bytes = payload_len,
        stitched_bytes = stitched.len(),
        "WAV buffers stitched"
    );

    Ok(stitched)
}

fn read_u16_le(buffer: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buffer[offset], buffer[offset + 1]])
}

fn read_u32_le(buffer: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buffer[offset],
        buffer[offset + 1],
        buffer[offset + 2],
        buffer[offset + 3],
    ])
}

fn write_u32_le(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
