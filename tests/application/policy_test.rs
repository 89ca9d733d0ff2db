use skopun::application::services::PipelinePolicy;

const MIB: u64 = 1024 * 1024;

#[test]
fn given_file_under_both_ceilings_when_checking_branch_then_fits_direct() {
    let policy = PipelinePolicy::default();

    assert!(policy.fits_direct(10 * MIB, 180.0));
}

#[test]
fn given_file_exactly_at_both_ceilings_when_checking_branch_then_still_fits_direct() {
    let policy = PipelinePolicy::default();

    assert!(policy.fits_direct(policy.size_ceiling_bytes, policy.duration_ceiling_seconds));
}

#[test]
fn given_file_one_byte_over_size_ceiling_when_checking_branch_then_requires_segmentation() {
    let policy = PipelinePolicy::default();

    assert!(!policy.fits_direct(policy.size_ceiling_bytes + 1, 60.0));
}

#[test]
fn given_file_over_duration_ceiling_when_checking_branch_then_requires_segmentation() {
    let policy = PipelinePolicy::default();

    assert!(!policy.fits_direct(MIB, policy.duration_ceiling_seconds + 0.1));
}

#[test]
fn given_file_at_compression_threshold_when_checking_then_no_compression() {
    let policy = PipelinePolicy::default();

    assert!(!policy.needs_compression(policy.compression_threshold_bytes));
    assert!(policy.needs_compression(policy.compression_threshold_bytes + 1));
}

#[test]
fn given_short_transcript_when_taking_context_tail_then_whole_text_is_returned() {
    let policy = PipelinePolicy::default();

    assert_eq!(policy.context_tail("a short ending"), "a short ending");
}

#[test]
fn given_long_transcript_when_taking_context_tail_then_only_the_suffix_is_returned() {
    let policy = PipelinePolicy {
        context_tail_chars: 5,
        ..Default::default()
    };

    assert_eq!(policy.context_tail("the quick brown fox"), "n fox");
}

#[test]
fn given_multibyte_text_when_taking_context_tail_then_cut_lands_on_a_char_boundary() {
    let policy = PipelinePolicy {
        context_tail_chars: 4,
        ..Default::default()
    };

    // Each char is multi-byte; a byte-offset cut would panic.
    assert_eq!(policy.context_tail("héllo wörld café"), "café");
}

#[test]
fn given_zero_tail_chars_when_taking_context_tail_then_result_is_empty() {
    let policy = PipelinePolicy {
        context_tail_chars: 0,
        ..Default::default()
    };

    assert_eq!(policy.context_tail("anything"), "");
}
