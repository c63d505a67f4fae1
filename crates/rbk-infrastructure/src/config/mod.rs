//! Configuration loading — Figment-based.
//!
//! All configuration flows through Figment: serialized defaults, then an
//! optional TOML file, then `RBK__`-prefixed environment variables with
//! double-underscore section nesting (`RBK__MATTS__PARALLEL_ENABLED`).
//! Extraction is followed by fail-fast validation; there are no implicit
//! fallbacks.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use rbk_domain::error::{Error, Result};
use rbk_domain::value_objects::{
    ConsolidationConfig, EmbeddingConfig, ExtractionConfig, MattsConfig,
};
use serde::{Deserialize, Serialize};

/// Environment variable prefix; sections nest with double underscores.
pub const ENV_PREFIX: &str = "RBK__";
/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rbk.toml";

/// Background maintenance scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Seconds between consolidation runs
    pub interval_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            interval_secs: 21_600,
        }
    }
}

/// Logging defaults; `RUST_LOG` still takes precedence at init.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter directive
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scaling feature gates and sizes
    pub matts: MattsConfig,
    /// Fixed embedding dimension
    pub embedding: EmbeddingConfig,
    /// Consolidation thresholds
    pub consolidation: ConsolidationConfig,
    /// Extraction sampling limits
    pub extraction: ExtractionConfig,
    /// Maintenance scheduling
    pub maintenance: MaintenanceConfig,
    /// Logging defaults
    pub logging: LoggingConfig,
}

/// Configuration loader service.
#[derive(Clone, Default)]
pub struct ConfigLoader {
    /// Optional explicit config file path (overrides the default lookup)
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set an explicit configuration file path.
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration: defaults, then TOML file, then environment.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction fails or validation detects invalid
    /// values.
    pub fn load(&self) -> Result<AppConfig> {
        let toml_path = self
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(toml_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("configuration extraction failed: {e}")))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &AppConfig) -> Result<()> {
        if config.embedding.dimension == 0 {
            return Err(Error::ConfigInvalid {
                key: "embedding.dimension".to_owned(),
                message: "must be positive".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&config.consolidation.low_quality_threshold) {
            return Err(Error::ConfigInvalid {
                key: "consolidation.low_quality_threshold".to_owned(),
                message: "must lie in [0, 1]".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&config.consolidation.duplicate_similarity_threshold) {
            return Err(Error::ConfigInvalid {
                key: "consolidation.duplicate_similarity_threshold".to_owned(),
                message: "must lie in [0, 1]".to_owned(),
            });
        }
        if config.consolidation.stale_days < 1 {
            return Err(Error::ConfigInvalid {
                key: "consolidation.stale_days".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        if config.consolidation.scan_limit == 0 {
            return Err(Error::ConfigInvalid {
                key: "consolidation.scan_limit".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        if config.matts.parallel_variants == 0 {
            return Err(Error::ConfigInvalid {
                key: "matts.parallel_variants".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        if config.matts.sequential_iterations == 0 {
            return Err(Error::ConfigInvalid {
                key: "matts.sequential_iterations".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        if config.maintenance.interval_secs == 0 {
            return Err(Error::ConfigInvalid {
                key: "maintenance.interval_secs".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}
