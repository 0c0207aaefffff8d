use super::AudioConverter;
use crate::domain::speech::AudioFormat;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pipes audio through an `ffmpeg` child process.
pub struct FfmpegAudioConverter {
    binary: String,
    timeout: Duration,
}

impl Default for FfmpegAudioConverter {
    fn default() -> Self {
        Self::new("ffmpeg", DEFAULT_TIMEOUT)
    }
}

impl FfmpegAudioConverter {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AudioConverter for FfmpegAudioConverter {
    async fn convert_to_wav(&self, audio: &[u8], format: AudioFormat) -> Result<Vec<u8>, String> {
        tracing::info!(
            input_format = %format,
            input_size = audio.len(),
            "Converting audio to WAV"
        );

        let mut child = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-i", "pipe:0"])
            .args(["-ar", "16000", "-ac", "1", "-acodec", "pcm_s16le", "-f", "wav", "pipe:1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", self.binary, e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| "ffmpeg stdin unavailable".to_string())?;
        let input = audio.to_vec();
        // Fed from a separate task so a full stdout pipe cannot stall the write.
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        // Dropping the child on timeout kills the process.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| format!("ffmpeg timed out after {}s", self.timeout.as_secs()))?
            .map_err(|e| format!("ffmpeg failed: {}", e))?;

        if let Ok(Err(e)) = writer.await {
            tracing::debug!(error = %e, "ffmpeg closed its input early");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, stderr = %stderr.trim(), "ffmpeg conversion failed");
            return Err(format!("ffmpeg exited with {}: {}", output.status, stderr.trim()));
        }
        if output.stdout.is_empty() {
            return Err("ffmpeg produced no audio".to_string());
        }

        tracing::info!(output_size = output.stdout.len(), "Audio converted to WAV");
        Ok(output.stdout)
    }
}
