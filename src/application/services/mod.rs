mod events;
mod pipeline;
mod policy;
mod segmenter;
mod workspace;

pub use events::{FinalResult, PipelineEvent};
pub use pipeline::{PipelineError, TranscriptionPipeline, UploadedAudio};
pub use policy::PipelinePolicy;
pub use segmenter::{SegmentCreationError, SegmentFile, Segmenter};
pub use workspace::RunWorkspace;
