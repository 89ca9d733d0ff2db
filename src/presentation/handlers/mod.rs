mod archive;
mod health;
mod history;
mod transcribe;

pub use archive::archive_transcript_handler;
pub use health::health_handler;
pub use history::{get_transcript_handler, list_transcripts_handler};
pub use transcribe::transcribe_handler;
