//! Trajectory scorer properties.

use rbk_application::score_trajectory;
use rstest::rstest;

use crate::support::report;

#[test]
fn missing_result_scores_zero() {
    assert_eq!(score_trajectory(None), 0.0);
}

#[test]
fn failed_result_scores_zero_regardless_of_bonuses() {
    let r = report(false, Some(1), Some(10), 10, 5_000);
    assert_eq!(score_trajectory(Some(&r)), 0.0);
}

#[rstest]
#[case::bare_success(None, None, 0, 0, 0.5)]
#[case::fast_steps(Some(5), None, 0, 0, 0.7)]
#[case::quick_execution(None, Some(3_000), 0, 0, 0.6)]
#[case::rich_output(None, None, 6, 0, 0.6)]
#[case::long_report(None, None, 0, 1_001, 0.6)]
fn each_bonus_contributes_its_weight(
    #[case] steps: Option<u32>,
    #[case] execution_time_ms: Option<u64>,
    #[case] output_keys: usize,
    #[case] html_len: usize,
    #[case] expected: f64,
) {
    let r = report(true, steps, execution_time_ms, output_keys, html_len);
    assert!((score_trajectory(Some(&r)) - expected).abs() < 1e-12);
}

#[test]
fn all_bonuses_clamp_to_one() {
    let r = report(true, Some(1), Some(100), 10, 5_000);
    assert!((score_trajectory(Some(&r)) - 1.0).abs() < 1e-12);
}

#[test]
fn boundaries_earn_no_bonus() {
    // Every threshold is strict: 10 steps, 5000 ms, 5 keys, 1000 chars.
    let r = report(true, Some(10), Some(5_000), 5, 1_000);
    assert!((score_trajectory(Some(&r)) - 0.5).abs() < 1e-12);
}

#[test]
fn adding_a_positive_field_never_decreases_score() {
    let without = report(true, None, Some(3_000), 0, 0);
    let with = report(true, Some(5), Some(3_000), 0, 0);
    assert!(score_trajectory(Some(&with)) >= score_trajectory(Some(&without)));
}

#[test]
fn scores_stay_in_unit_interval() {
    let shapes = [
        report(true, None, None, 0, 0),
        report(true, Some(0), Some(0), 20, 10_000),
        report(false, None, None, 0, 0),
    ];
    for shape in &shapes {
        let score = score_trajectory(Some(shape));
        assert!((0.0..=1.0).contains(&score));
    }
}
