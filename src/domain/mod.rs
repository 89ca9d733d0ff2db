mod audio;
mod segment;
mod transcript;

pub use audio::{AudioInfo, AudioSource, SourceId};
pub use segment::{Segment, SegmentPlan, SegmentPlanError};
pub use transcript::{
    SegmentTranscript, TranscriptId, TranscriptRecord, assemble_transcript, placeholder_text,
};
