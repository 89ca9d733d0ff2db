/// One bounded time range of the original audio, to be materialized as its
/// own file and transcribed independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl Segment {
    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// Ordered, contiguous, non-overlapping segments covering `[0, duration]`
/// exactly. The last segment's end is clamped to the total duration.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPlan {
    segments: Vec<Segment>,
}

#[derive(Debug, thiserror::Error)]
pub enum SegmentPlanError {
    #[error("invalid chunk duration: {0} (must be > 0)")]
    InvalidPolicy(f64),
    #[error("invalid audio duration: {0} (must be finite and >= 0)")]
    InvalidDuration(f64),
}

impl SegmentPlan {
    pub fn build(
        duration_seconds: f64,
        chunk_duration_seconds: f64,
    ) -> Result<Self, SegmentPlanError> {
        if !chunk_duration_seconds.is_finite() || chunk_duration_seconds <= 0.0 {
            return Err(SegmentPlanError::InvalidPolicy(chunk_duration_seconds));
        }
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(SegmentPlanError::InvalidDuration(duration_seconds));
        }

        let count = (duration_seconds / chunk_duration_seconds).ceil() as usize;
        let mut segments = Vec::with_capacity(count);
        for index in 0..count {
            let start_seconds = index as f64 * chunk_duration_seconds;
            let end_seconds = (start_seconds + chunk_duration_seconds).min(duration_seconds);
            segments.push(Segment {
                index,
                start_seconds,
                end_seconds,
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
