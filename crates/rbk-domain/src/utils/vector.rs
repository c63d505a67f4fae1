//! Defensive vector math.
//!
//! Retrieval and consolidation both funnel through [`cosine_similarity`];
//! it never panics and never divides by zero. Malformed input degrades to
//! a similarity of `0.0` with a warning, so one bad record cannot abort a
//! scan over ten thousand good ones.

use tracing::warn;

/// Cosine similarity of two raw vectors, in `[-1.0, 1.0]`.
///
/// Returns `0.0` when either vector is empty, the lengths differ, any
/// component is not finite, or either magnitude is zero. Accumulates in
/// `f64` regardless of the `f32` component type.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() {
        warn!(len_a = a.len(), len_b = b.len(), "cosine on empty vector");
        return 0.0;
    }
    if a.len() != b.len() {
        warn!(
            len_a = a.len(),
            len_b = b.len(),
            "cosine on mismatched vector lengths"
        );
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        if !x.is_finite() || !y.is_finite() {
            warn!("cosine on non-finite component");
            return 0.0;
        }
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}
