use skopun::domain::{SegmentPlan, SegmentPlanError};

#[test]
fn given_duration_divisible_by_chunk_when_building_plan_then_segments_are_equal_length() {
    let plan = SegmentPlan::build(1800.0, 600.0).unwrap();

    assert_eq!(plan.len(), 3);
    for (i, segment) in plan.segments().iter().enumerate() {
        assert_eq!(segment.index, i);
        assert_eq!(segment.start_seconds, i as f64 * 600.0);
        assert_eq!(segment.duration_seconds(), 600.0);
    }
}

#[test]
fn given_duration_with_remainder_when_building_plan_then_last_segment_is_clamped() {
    // 40 minutes at 9-minute chunks: 5 segments, the last one 4 minutes.
    let plan = SegmentPlan::build(2400.0, 540.0).unwrap();

    assert_eq!(plan.len(), 5);
    let last = plan.segments().last().unwrap();
    assert_eq!(last.start_seconds, 2160.0);
    assert_eq!(last.end_seconds, 2400.0);
    assert_eq!(last.duration_seconds(), 240.0);
}

#[test]
fn given_any_plan_when_inspecting_segments_then_they_are_contiguous_and_cover_duration() {
    let plan = SegmentPlan::build(1234.5, 300.0).unwrap();

    let segments = plan.segments();
    assert_eq!(segments.first().unwrap().start_seconds, 0.0);
    assert_eq!(segments.last().unwrap().end_seconds, 1234.5);
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end_seconds, pair[1].start_seconds);
    }
}

#[test]
fn given_duration_shorter_than_chunk_when_building_plan_then_single_segment() {
    let plan = SegmentPlan::build(120.0, 540.0).unwrap();

    assert_eq!(plan.len(), 1);
    let only = plan.segments()[0];
    assert_eq!(only.start_seconds, 0.0);
    assert_eq!(only.end_seconds, 120.0);
}

#[test]
fn given_zero_duration_when_building_plan_then_plan_is_empty() {
    let plan = SegmentPlan::build(0.0, 540.0).unwrap();

    assert!(plan.is_empty());
}

#[test]
fn given_non_positive_chunk_duration_when_building_plan_then_returns_policy_error() {
    assert!(matches!(
        SegmentPlan::build(600.0, 0.0),
        Err(SegmentPlanError::InvalidPolicy(_))
    ));
    assert!(matches!(
        SegmentPlan::build(600.0, -5.0),
        Err(SegmentPlanError::InvalidPolicy(_))
    ));
}

#[test]
fn given_negative_or_non_finite_duration_when_building_plan_then_returns_duration_error() {
    assert!(matches!(
        SegmentPlan::build(-1.0, 540.0),
        Err(SegmentPlanError::InvalidDuration(_))
    ));
    assert!(matches!(
        SegmentPlan::build(f64::NAN, 540.0),
        Err(SegmentPlanError::InvalidDuration(_))
    ));
}
