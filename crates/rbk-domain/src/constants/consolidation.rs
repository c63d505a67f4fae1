//! Consolidation threshold defaults -- Single Source of Truth
//!
//! Operational config may override these; the algorithms never hard-code
//! their own copies.

/// Success rate below which a well-exercised record is pruned.
pub const LOW_QUALITY_THRESHOLD: f64 = 0.30;
/// Retrievals a record must have before it can be pruned.
pub const MIN_RETRIEVALS_FOR_PRUNE: u64 = 10;
/// Cosine similarity at or above which two records are duplicates.
pub const DUP_SIMILARITY_THRESHOLD: f64 = 0.95;
/// Days without a touch before a record is archived.
pub const STALE_DAYS: i64 = 90;
/// Practical cap on a full-store scan.
pub const CONSOLIDATION_SCAN_LIMIT: usize = 10_000;
