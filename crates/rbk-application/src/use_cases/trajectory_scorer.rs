//! Pure trajectory scoring.
//!
//! Scoring model (additive, clamped to 1.0):
//! ```text
//! score = base(0.5) + fast_steps(0.2) + quick_exec(0.1) + rich_output(0.1) + report(0.1)
//! ```
//! A missing or failed result scores 0. Both scaling strategies use this
//! function verbatim, so their selections are directly comparable.

use rbk_domain::entities::scaling::ExecutionReport;

use crate::constants::{
    SCORE_BASE, SCORE_FAST_STEPS_BONUS, SCORE_FAST_STEPS_MAX, SCORE_QUICK_EXEC_BONUS,
    SCORE_QUICK_EXEC_MAX_MS, SCORE_REPORT_BONUS, SCORE_REPORT_MIN_LEN, SCORE_RICH_OUTPUT_BONUS,
    SCORE_RICH_OUTPUT_MIN_KEYS,
};

/// Score an execution result in `[0.0, 1.0]`.
///
/// Deterministic, no I/O. Reads only `success`, `steps`,
/// `execution_time_ms`, `output_data`, and `html_report`.
#[must_use]
pub fn score_trajectory(result: Option<&ExecutionReport>) -> f64 {
    let Some(report) = result else {
        return 0.0;
    };
    if !report.success {
        return 0.0;
    }

    let mut score = SCORE_BASE;
    if report.steps.is_some_and(|s| s < SCORE_FAST_STEPS_MAX) {
        score += SCORE_FAST_STEPS_BONUS;
    }
    if report
        .execution_time_ms
        .is_some_and(|ms| ms < SCORE_QUICK_EXEC_MAX_MS)
    {
        score += SCORE_QUICK_EXEC_BONUS;
    }
    if report
        .output_data
        .as_ref()
        .is_some_and(|data| data.len() > SCORE_RICH_OUTPUT_MIN_KEYS)
    {
        score += SCORE_RICH_OUTPUT_BONUS;
    }
    if report
        .html_report
        .as_ref()
        .is_some_and(|html| html.len() > SCORE_REPORT_MIN_LEN)
    {
        score += SCORE_REPORT_BONUS;
    }

    score.min(1.0)
}
