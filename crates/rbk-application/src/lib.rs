//! # Application Layer
//!
//! Use cases of the ReasoningBank memory core: consolidation, trajectory
//! scoring, memory-aware test-time scaling, failure-to-memory extraction,
//! and code-generation retrieval.
//!
//! Every service here depends only on the domain ports; adapters are
//! injected by the infrastructure layer at startup.
#![allow(missing_docs)]

/// Use-case local constants
pub mod constants;
/// Use-case service implementations
pub mod use_cases;

pub use use_cases::consolidation_service::ConsolidationServiceImpl;
pub use use_cases::extraction_service::ExtractionServiceImpl;
pub use use_cases::parallel_scaling::ParallelScalingImpl;
pub use use_cases::retrieval_service::CodeGenRetrievalImpl;
pub use use_cases::sequential_scaling::SequentialScalingImpl;
pub use use_cases::trajectory_scorer::score_trajectory;
