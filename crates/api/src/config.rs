//! Service configuration
//!
//! Layered as defaults, then an optional TOML file, then `STROKE_RISK__*`
//! environment variables (e.g. `STROKE_RISK__SERVER__BIND_ADDR`).

use crate::rate_limit::RateLimitConfig;
use feature_engine::FallbackPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "stroke-risk.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STROKE_RISK";

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,
    /// Max predictions kept in history across all users
    pub max_history: usize,
    /// Expose Prometheus metrics on `/metrics`
    pub enable_metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_history: 10_000,
            enable_metrics: true,
        }
    }
}

/// Where the trained artifacts live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Pipeline policy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub fallback_policy: FallbackPolicy,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `path` (optional file) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        ::config::Config::builder()
            .add_source(::config::Config::try_from(&ServiceConfig::default())?)
            .add_source(::config::File::from(file).required(path.is_some()))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
