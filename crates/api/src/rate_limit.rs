//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Limits prediction traffic per peer IP with tower_governor. Needs the
//! service to be built with `into_make_service_with_connect_info::<SocketAddr>()`.

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config keyed by peer IP, with X-RateLimit-* headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Seconds between quota replenishments
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 1,
            burst_size: 20,
        }
    }
}

/// Invalid rate limit settings
#[derive(Debug, thiserror::Error)]
#[error("Invalid rate limit: per_second={per_second}, burst_size={burst_size}")]
pub struct RateLimitError {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Build the governor config for [`tower_governor::GovernorLayer`]
pub fn create_governor_config(
    config: &RateLimitConfig,
) -> Result<Arc<DefaultGovernorConfig>, RateLimitError> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
        .ok_or(RateLimitError {
            per_second: config.per_second,
            burst_size: config.burst_size,
        })
}
