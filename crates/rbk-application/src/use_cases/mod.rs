//! Use-case service implementations.

/// Prune / merge / archive maintenance
pub mod consolidation_service;
/// Failure-to-memory extraction
pub mod extraction_service;
/// Parallel self-contrast scaling
pub mod parallel_scaling;
/// Code-generation retrieval
pub mod retrieval_service;
/// Sequential self-refinement scaling
pub mod sequential_scaling;
/// Pure trajectory scoring
pub mod trajectory_scorer;
