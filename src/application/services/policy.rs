use std::time::Duration;

/// Thresholds and knobs governing one pipeline run. Resolved once at startup;
/// a single consistent default set rather than per-call-site constants.
#[derive(Debug, Clone)]
pub struct PipelinePolicy {
    /// Inclusive ceiling for direct transcription, in bytes.
    pub size_ceiling_bytes: u64,
    /// Inclusive ceiling for direct transcription, in seconds.
    pub duration_ceiling_seconds: f64,
    /// Target length of each segment when splitting, in seconds.
    pub chunk_duration_seconds: f64,
    /// Inputs larger than this are re-encoded once before the branch
    /// decision is (re-)evaluated.
    pub compression_threshold_bytes: u64,
    /// Bitrate for the one-shot compression re-encode.
    pub compression_bitrate_kbps: u32,
    /// Separator between segment texts in the reassembled transcript.
    pub separator: String,
    /// Max chars of the previous successful transcript carried forward as
    /// the next segment's context prompt.
    pub context_tail_chars: usize,
    /// Bound on each provider call.
    pub provider_timeout_seconds: u64,
    /// Bound on each transcoding tool invocation.
    pub tool_timeout_seconds: u64,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            size_ceiling_bytes: 25 * 1024 * 1024,
            duration_ceiling_seconds: 600.0,
            chunk_duration_seconds: 540.0,
            compression_threshold_bytes: 25 * 1024 * 1024,
            compression_bitrate_kbps: 64,
            separator: "\n\n".to_string(),
            context_tail_chars: 240,
            provider_timeout_seconds: 120,
            tool_timeout_seconds: 300,
        }
    }
}

impl PipelinePolicy {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_seconds)
    }

    /// Inclusive boundary: a file exactly at both ceilings is still direct.
    pub fn fits_direct(&self, size_bytes: u64, duration_seconds: f64) -> bool {
        size_bytes <= self.size_ceiling_bytes && duration_seconds <= self.duration_ceiling_seconds
    }

    pub fn needs_compression(&self, size_bytes: u64) -> bool {
        size_bytes > self.compression_threshold_bytes
    }

    /// Char-boundary-safe suffix of a transcript used as context prompt.
    pub fn context_tail<'a>(&self, text: &'a str) -> &'a str {
        if self.context_tail_chars == 0 {
            return "";
        }
        let char_count = text.chars().count();
        if char_count <= self.context_tail_chars {
            return text;
        }
        let skip = char_count - self.context_tail_chars;
        match text.char_indices().nth(skip) {
            Some((byte_offset, _)) => &text[byte_offset..],
            None => text,
        }
    }
}
