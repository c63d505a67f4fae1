//! Test-time scaling retrieval defaults.

/// Memories fetched per requested parallel variant (3·N total).
pub const PARALLEL_RETRIEVAL_MULTIPLIER: usize = 3;
/// Minimum success rate for memories seeding parallel variants.
pub const PARALLEL_MIN_SUCCESS_RATE: f64 = 0.5;
/// Memories fetched per sequential iteration.
pub const SEQUENTIAL_TOP_K: usize = 5;
/// Minimum success rate for memories seeding sequential iterations.
pub const SEQUENTIAL_MIN_SUCCESS_RATE: f64 = 0.6;
/// Score above which a successful sequential iteration stops early.
pub const SEQUENTIAL_EARLY_STOP_SCORE: f64 = 0.9;
