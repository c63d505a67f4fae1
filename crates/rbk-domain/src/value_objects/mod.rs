//! Immutable value objects compared by value.

mod config;
mod embedding;
mod filters;

pub use config::{ConsolidationConfig, EmbeddingConfig, ExtractionConfig, MattsConfig};
pub use embedding::Embedding;
pub use filters::RetrievalFilters;
