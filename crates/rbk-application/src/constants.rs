//! Use-case constants -- algorithmic invariants, not operational config.

/// Base score for any successful trajectory.
pub const SCORE_BASE: f64 = 0.5;
/// Bonus for finishing in fewer than [`SCORE_FAST_STEPS_MAX`] steps.
pub const SCORE_FAST_STEPS_BONUS: f64 = 0.2;
/// Step count below which the fast-steps bonus applies.
pub const SCORE_FAST_STEPS_MAX: u32 = 10;
/// Bonus for finishing under [`SCORE_QUICK_EXEC_MAX_MS`].
pub const SCORE_QUICK_EXEC_BONUS: f64 = 0.1;
/// Execution time below which the quick-exec bonus applies.
pub const SCORE_QUICK_EXEC_MAX_MS: u64 = 5_000;
/// Bonus for rich structured output.
pub const SCORE_RICH_OUTPUT_BONUS: f64 = 0.1;
/// Distinct output keys required for the rich-output bonus (strictly more).
pub const SCORE_RICH_OUTPUT_MIN_KEYS: usize = 5;
/// Bonus for a substantial rendered report.
pub const SCORE_REPORT_BONUS: f64 = 0.1;
/// Report length required for the report bonus (strictly more).
pub const SCORE_REPORT_MIN_LEN: usize = 1_000;

/// Over-fetch multiplier for code-generation retrieval filtering.
pub const CODEGEN_OVERFETCH_MULTIPLIER: usize = 2;
/// Build-preferred results required before the preference kicks in.
pub const CODEGEN_MIN_BUILD_RESULTS: usize = 2;
