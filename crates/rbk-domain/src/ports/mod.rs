//! Port interfaces the core consumes and exposes.
//!
//! | Port | Description |
//! | ------ | ------------- |
//! | [`repositories::MemoryRepository`] | Persistent memory store |
//! | [`providers::EmbeddingProvider`] | Text embedding generation |
//! | [`providers::TextGenerator`] | Prompted text generation (extraction only) |
//! | [`execution::TaskExecutor`] | Caller-supplied task execution |
//! | [`execution::TaskReflector`] | Caller-supplied trajectory reflection |
//! | [`services`] | Interfaces the core exposes upward |

/// Caller-supplied execution capabilities
pub mod execution;
/// External provider ports
pub mod providers;
/// Repository ports
pub mod repositories;
/// Service interfaces exposed upward
pub mod services;

pub use execution::{TaskExecutor, TaskReflector};
pub use providers::{EmbeddingKind, EmbeddingProvider, GenerationOptions, TextGenerator};
pub use repositories::MemoryRepository;
pub use services::{
    CodeGenRetrievalInterface, ConsolidationServiceInterface, ExtractionServiceInterface,
    ParallelScalingInterface, SequentialScalingInterface,
};
