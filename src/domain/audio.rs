use std::path::PathBuf;

use uuid::Uuid;

/// An uploaded audio file staged on local disk for the lifetime of one
/// pipeline run. The backing file lives inside the run workspace and is
/// removed with it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub id: SourceId,
    pub path: PathBuf,
    pub original_name: String,
    pub size_bytes: u64,
    pub mime_hint: Option<String>,
}

impl AudioSource {
    pub fn new(
        path: PathBuf,
        original_name: String,
        size_bytes: u64,
        mime_hint: Option<String>,
    ) -> Self {
        Self {
            id: SourceId::new(),
            path,
            original_name,
            size_bytes,
            mime_hint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(Uuid);

impl SourceId {
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

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe result for one audio file. Derived once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    pub duration_seconds: f64,
    pub size_bytes: u64,
}
