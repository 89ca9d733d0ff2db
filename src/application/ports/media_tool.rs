use std::path::Path;

use async_trait::async_trait;

use crate::domain::AudioInfo;

/// Target encoding for a transform: the provider's preferred ingest format.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEncoding {
    pub codec: String,
    pub container_extension: String,
    pub sample_rate_hz: u32,
    pub channels: u8,
    pub bitrate_kbps: Option<u32>,
}

impl AudioEncoding {
    /// 16 kHz mono PCM WAV, the strictest ingest format among providers.
    pub fn wav_mono_16k() -> Self {
        Self {
            codec: "pcm_s16le".to_string(),
            container_extension: "wav".to_string(),
            sample_rate_hz: 16_000,
            channels: 1,
            bitrate_kbps: None,
        }
    }

    /// Compressed mono mp3, used to shrink oversized inputs.
    pub fn mp3_mono_16k(bitrate_kbps: u32) -> Self {
        Self {
            codec: "libmp3lame".to_string(),
            container_extension: "mp3".to_string(),
            sample_rate_hz: 16_000,
            channels: 1,
            bitrate_kbps: Some(bitrate_kbps),
        }
    }

    /// Lossy variant of this encoding, for shrinking oversized inputs. An
    /// already-compressed encoding keeps its codec at the given bitrate; a
    /// PCM encoding falls back to mp3 since re-encoding PCM to PCM cannot
    /// reduce size. Rate and channel count are preserved either way.
    pub fn compressed_variant(&self, bitrate_kbps: u32) -> Self {
        if self.bitrate_kbps.is_some() {
            Self {
                bitrate_kbps: Some(bitrate_kbps),
                ..self.clone()
            }
        } else {
            Self {
                codec: "libmp3lame".to_string(),
                container_extension: "mp3".to_string(),
                sample_rate_hz: self.sample_rate_hz,
                channels: self.channels,
                bitrate_kbps: Some(bitrate_kbps),
            }
        }
    }
}

/// One re-encode invocation: optional time window plus target encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSpec {
    pub start_seconds: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub encoding: AudioEncoding,
}

impl TransformSpec {
    pub fn reencode(encoding: AudioEncoding) -> Self {
        Self {
            start_seconds: None,
            duration_seconds: None,
            encoding,
        }
    }

    pub fn trim(start_seconds: f64, duration_seconds: f64, encoding: AudioEncoding) -> Self {
        Self {
            start_seconds: Some(start_seconds),
            duration_seconds: Some(duration_seconds),
            encoding,
        }
    }
}

/// The external transcoding tool, treated as a black box: probe a media file
/// for duration/size, or materialize a (possibly trimmed) re-encode of it.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Read-only scan; does not hold the file open after returning.
    async fn probe(&self, path: &Path) -> Result<AudioInfo, ProbeError>;

    async fn transform(
        &self,
        input: &Path,
        spec: &TransformSpec,
        output: &Path,
    ) -> Result<(), TransformError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("unreadable media: {0}")]
    Unreadable(String),
    #[error("no audio track in input")]
    NoAudioTrack,
    #[error("probe timed out after {0} seconds")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("transcode failed: {0}")]
    Failed(String),
    #[error("transcode timed out after {0} seconds")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
