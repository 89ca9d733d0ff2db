use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::application::ports::{MediaTool, ProbeError, TransformError, TransformSpec};
use crate::domain::AudioInfo;

/// Media prober/transcoder backed by the ffmpeg and ffprobe binaries. Each
/// invocation is an awaitable subprocess bounded by a timeout; a timed-out
/// child is killed on drop rather than left running.
pub struct FfmpegMediaTool {
    ffmpeg_bin: String,
    ffprobe_bin: String,
    timeout: Duration,
}

impl FfmpegMediaTool {
    pub fn new(timeout: Duration) -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            timeout,
        }
    }

    pub fn with_binaries(
        ffmpeg_bin: impl Into<String>,
        ffprobe_bin: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MediaTool for FfmpegMediaTool {
    async fn probe(&self, path: &Path) -> Result<AudioInfo, ProbeError> {
        let size_bytes = tokio::fs::metadata(path).await?.len();

        let mut cmd = Command::new(&self.ffprobe_bin);
        cmd.args(probe_args(path))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(path = %path.display(), "Probing media file");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout.as_secs()))?
            .map_err(ProbeError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Unreadable(stderr.trim().to_string()));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let duration_seconds = parse_probe_output(&raw)?;

        Ok(AudioInfo {
            duration_seconds,
            size_bytes,
        })
    }

    async fn transform(
        &self,
        input: &Path,
        spec: &TransformSpec,
        output_path: &Path,
    ) -> Result<(), TransformError> {
        let args = transform_args(input, spec, output_path);

        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            input = %input.display(),
            output = %output_path.display(),
            start = ?spec.start_seconds,
            duration = ?spec.duration_seconds,
            codec = %spec.encoding.codec,
            "Transcoding"
        );

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| TransformError::Timeout(self.timeout.as_secs()))?
            .map_err(TransformError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransformError::Failed(stderr.trim().to_string()));
        }

        Ok(())
    }
}

fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_format".to_string(),
        "-show_streams".to_string(),
        "-select_streams".to_string(),
        "a".to_string(),
        path.display().to_string(),
    ]
}

fn transform_args(input: &Path, spec: &TransformSpec, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
    ];

    // Seek before the input: accurate enough here since every transform
    // re-encodes.
    if let Some(start) = spec.start_seconds {
        args.push("-ss".to_string());
        args.push(format!("{:.3}", start));
    }
    args.push("-i".to_string());
    args.push(input.display().to_string());

    if let Some(duration) = spec.duration_seconds {
        args.push("-t".to_string());
        args.push(format!("{:.3}", duration));
    }

    args.push("-vn".to_string());
    args.push("-ac".to_string());
    args.push(spec.encoding.channels.to_string());
    args.push("-ar".to_string());
    args.push(spec.encoding.sample_rate_hz.to_string());
    args.push("-c:a".to_string());
    args.push(spec.encoding.codec.clone());
    if let Some(bitrate) = spec.encoding.bitrate_kbps {
        args.push("-b:a".to_string());
        args.push(format!("{}k", bitrate));
    }

    args.push(output.display().to_string());
    args
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    duration: Option<String>,
}

fn parse_probe_output(raw: &str) -> Result<f64, ProbeError> {
    let parsed: ProbeOutput = serde_json::from_str(raw)
        .map_err(|e| ProbeError::Unreadable(format!("ffprobe output: {}", e)))?;

    let audio_streams: Vec<&ProbeStream> = parsed
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("audio"))
        .collect();
    if audio_streams.is_empty() {
        return Err(ProbeError::NoAudioTrack);
    }

    let duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or_else(|| audio_streams.iter().find_map(|s| s.duration.as_deref()))
        .ok_or_else(|| ProbeError::Unreadable("no duration reported".to_string()))?;

    duration
        .parse::<f64>()
        .map_err(|e| ProbeError::Unreadable(format!("duration '{}': {}", duration, e)))
}
