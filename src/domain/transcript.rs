use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Transcription outcome for one segment. A failed segment keeps its ordered
/// slot with a placeholder text so reassembly preserves position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTranscript {
    pub segment_index: usize,
    pub text: String,
    pub error: Option<String>,
}

impl SegmentTranscript {
    pub fn success(segment_index: usize, text: String) -> Self {
        Self {
            segment_index,
            text,
            error: None,
        }
    }

    pub fn failed(segment_index: usize, error: String) -> Self {
        Self {
            segment_index,
            text: placeholder_text(segment_index),
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Bracketed marker inserted in place of a failed segment's transcript,
/// visually distinguishable from real text. Indices are 1-based for readers.
pub fn placeholder_text(segment_index: usize) -> String {
    format!("[segment {} transcription failed]", segment_index + 1)
}

/// Join segment texts (real or placeholder) in index order with a single
/// separator between each. Relies on the results already being ordered by
/// the sequential pipeline, not on sorting after the fact.
pub fn assemble_transcript(results: &[SegmentTranscript], separator: &str) -> String {
    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    texts.join(separator)
}

/// A persisted transcript. Append-only, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptRecord {
    pub id: TranscriptId,
    pub filename: String,
    pub transcript: String,
    pub created_at: DateTime<Utc>,
}

impl TranscriptRecord {
    pub fn new(filename: String, transcript: String) -> Self {
        Self {
            id: TranscriptId::new(),
            filename,
            transcript,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TranscriptId(Uuid);

impl TranscriptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TranscriptId {
    fn default() -> Self {
        Self::new()
    }
}
