mod memory_repository;
mod pg_pool;
mod pg_transcript_repository;

pub use memory_repository::InMemoryTranscriptRepository;
pub use pg_pool::create_pool;
pub use pg_transcript_repository::PgTranscriptRepository;
