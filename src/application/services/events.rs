use serde::Serialize;

use crate::domain::SegmentTranscript;

/// Events emitted incrementally over the lifetime of one run. Progress
/// percentages are monotonically non-decreasing and advisory; not every
/// checkpoint fires on every path.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    Progress { percent: u8, message: String },
    Completed(FinalResult),
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalResult {
    pub transcript: String,
    pub duration_seconds: f64,
    pub size_bytes: u64,
    pub segments_total: usize,
    pub segments_failed: usize,
    /// Per-segment results; absent in direct mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentTranscript>>,
    /// Set when best-effort persistence succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}
