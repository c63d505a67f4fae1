//! # Infrastructure Layer
//!
//! Wiring for the ReasoningBank memory core: configuration loading,
//! logging initialization, the process-wide [`context::AppContext`], and
//! the periodic consolidation job.
#![allow(missing_docs)]

/// Configuration types and loader
pub mod config;
/// Process-wide dependency wiring
pub mod context;
/// Logging initialization
pub mod logging;
/// Background maintenance jobs
pub mod maintenance;

pub use config::{AppConfig, ConfigLoader};
pub use context::{AppContext, init_app};
pub use maintenance::{MaintenanceHandle, spawn_consolidation_job};
