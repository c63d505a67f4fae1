//! Process-wide dependency wiring.
//!
//! One [`AppContext`] per process replaces hidden module-level singletons:
//! it is constructed once at startup, holds the shared adapter handles,
//! and hands pre-wired service implementations to callers. Tests build
//! their own contexts with whatever adapters they need.

use std::sync::Arc;

use rbk_application::use_cases::consolidation_service::ConsolidationServiceImpl;
use rbk_application::use_cases::extraction_service::ExtractionServiceImpl;
use rbk_application::use_cases::parallel_scaling::ParallelScalingImpl;
use rbk_application::use_cases::retrieval_service::CodeGenRetrievalImpl;
use rbk_application::use_cases::sequential_scaling::SequentialScalingImpl;
use rbk_domain::error::Result;
use rbk_domain::ports::providers::{EmbeddingProvider, TextGenerator};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::ports::services::{
    CodeGenRetrievalInterface, ConsolidationServiceInterface, ExtractionServiceInterface,
    ParallelScalingInterface, SequentialScalingInterface,
};
use rbk_providers::{HashEmbedder, InMemoryMemoryRepository};
use tracing::info;

use crate::config::AppConfig;

/// Shared adapter handles plus the configuration they were built from.
///
/// Lifecycle: initialize once per process, drop on shutdown.
pub struct AppContext {
    config: AppConfig,
    repository: Arc<dyn MemoryRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl AppContext {
    /// Wire a context from explicit adapters.
    #[must_use]
    pub fn with_adapters(
        config: AppConfig,
        repository: Arc<dyn MemoryRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            config,
            repository,
            embedder,
        }
    }

    /// The configuration this context was built from.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared memory repository handle.
    #[must_use]
    pub fn repository(&self) -> Arc<dyn MemoryRepository> {
        Arc::clone(&self.repository)
    }

    /// Shared embedding provider handle.
    #[must_use]
    pub fn embedder(&self) -> Arc<dyn EmbeddingProvider> {
        Arc::clone(&self.embedder)
    }

    /// Pre-wired consolidation service.
    #[must_use]
    pub fn consolidation_service(&self) -> Arc<dyn ConsolidationServiceInterface> {
        Arc::new(ConsolidationServiceImpl::new(
            self.repository(),
            self.config.consolidation.clone(),
        ))
    }

    /// Pre-wired parallel scaling strategy.
    #[must_use]
    pub fn parallel_scaling(&self) -> Arc<dyn ParallelScalingInterface> {
        Arc::new(ParallelScalingImpl::new(
            self.repository(),
            self.embedder(),
            self.config.matts.clone(),
        ))
    }

    /// Pre-wired sequential scaling strategy.
    #[must_use]
    pub fn sequential_scaling(&self) -> Arc<dyn SequentialScalingInterface> {
        Arc::new(SequentialScalingImpl::new(
            self.repository(),
            self.embedder(),
            self.config.matts.clone(),
        ))
    }

    /// Pre-wired code-generation retrieval service.
    #[must_use]
    pub fn code_gen_retrieval(&self) -> Arc<dyn CodeGenRetrievalInterface> {
        Arc::new(CodeGenRetrievalImpl::new(
            self.repository(),
            self.embedder(),
        ))
    }

    /// Extraction service wired to the host-supplied text generator.
    #[must_use]
    pub fn extraction_service(
        &self,
        generator: Arc<dyn TextGenerator>,
    ) -> Arc<dyn ExtractionServiceInterface> {
        Arc::new(ExtractionServiceImpl::new(
            self.repository(),
            self.embedder(),
            generator,
            self.config.extraction.clone(),
        ))
    }
}

/// Build a context on the reference adapters: in-memory repository and
/// deterministic embedder sized by `config.embedding.dimension`.
///
/// # Errors
///
/// Currently infallible; kept fallible for adapter swaps that do fail.
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    let dimension = config.embedding.dimension;
    let repository: Arc<dyn MemoryRepository> =
        Arc::new(InMemoryMemoryRepository::new(dimension));
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(dimension));
    info!(dimension, "application context initialized");
    Ok(AppContext::with_adapters(config, repository, embedder))
}
