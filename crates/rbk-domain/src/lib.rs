//! # Domain Layer
//!
//! Core business logic and domain types for the ReasoningBank memory core.
//! Contains only pure domain entities, value objects, and business rules.
#![allow(missing_docs)]
//!
//! ## Architecture
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`entities`] | Core business entities with identity |
//! | [`value_objects`] | Immutable value objects |
//! | [`ports`] | Repository, provider, and service port interfaces |
//! | [`constants`] | Domain constants |
//! | [`error`] | Domain error types |
//!
//! ## Clean Architecture Principles
//!
//! - **Entities** are at the center with business rules
//! - **Value Objects** are immutable and compared by value
//! - **Pure business logic** - no infrastructure or application concerns
//!
//! ## Example
//!
//! ```
//! use rbk_domain::entities::memory::{MemoryCategory, MemoryDraft, MemorySource};
//! use rbk_domain::value_objects::Embedding;
//!
//! let draft = MemoryDraft {
//!     title: "Avoid unwrap in async handlers".to_owned(),
//!     description: "Panics in handlers take down the worker".to_owned(),
//!     content: "Propagate errors with ? instead of unwrapping.".to_owned(),
//!     category: MemoryCategory::FixStrategy,
//!     source: MemorySource::BuildRejection,
//!     embedding: Some(Embedding {
//!         vector: vec![0.1, 0.2],
//!         model: "test".into(),
//!         dimensions: 2,
//!     }),
//! };
//! assert!(draft.validate(2).is_ok());
//! ```

/// Domain-level constants
pub mod constants;
/// Core business entities with identity
pub mod entities;
/// Domain error types
pub mod error;
/// Repository, provider, and service port interfaces
pub mod ports;
/// Common utilities
pub mod utils;
/// Immutable value objects
pub mod value_objects;

// Re-export commonly used types for convenience
pub use constants::*;
pub use entities::*;
pub use error::{Error, Result};
pub use utils::{compute_content_hash, mask_id};
pub use value_objects::*;
