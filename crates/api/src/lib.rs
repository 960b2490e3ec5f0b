//! Stroke Risk API Server
//!
//! REST API for stroke-risk prediction and per-user prediction history.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod routes;

use artifact_store::ArtifactStore;
use inference_engine::InferenceContext;
use storage::Repository;

pub use crate::config::ServiceConfig;
pub use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    /// Prediction pipeline over the loaded artifacts
    pub context: InferenceContext,
    /// Prediction history
    pub repository: Repository,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(context: InferenceContext, repository: Repository) -> Self {
        Self {
            context,
            repository,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelInfo,
    pub prediction_count: usize,
}

/// Loaded model summary
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub schema_version: String,
    pub features: Vec<String>,
    pub trees: usize,
    pub fallback_policy: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/predict", post(routes::predictions::create_prediction))
        .route(
            "/api/v1/users/:user_id/predictions",
            get(routes::predictions::get_user_predictions),
        )
        .route(
            "/api/v1/users/:user_id/predictions/:id",
            get(routes::predictions::get_prediction),
        )
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let store = state.context.store();

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelInfo {
            schema_version: store.schema().version().to_string(),
            features: store.schema().names().iter().map(|n| n.to_string()).collect(),
            trees: store.classifier().trees.len(),
            fallback_policy: format!("{:?}", state.context.policy()),
        },
        prediction_count: state.repository.prediction_count(),
    };

    Json(response)
}

/// Prometheus metrics handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &crate::config::LoggingConfig) {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Logging already initialised: {e}");
    }
}

/// Load artifacts and build the shared state
pub fn build_state(config: &ServiceConfig) -> Result<AppState, artifact_store::ArtifactError> {
    let store = ArtifactStore::load(&config.artifacts.dir)?;
    let context = InferenceContext::new(Arc::new(store), config.pipeline.fallback_policy);
    Ok(AppState::new(
        context,
        Repository::with_capacity(config.server.max_history),
    ))
}

/// Run the server
pub async fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = build_state(&config)?;

    if config.server.enable_metrics {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => state = state.with_metrics(handle),
            Err(e) => warn!("Metrics exporter unavailable: {}", e),
        }
    }

    let governor = rate_limit::create_governor_config(&config.rate_limit)?;
    let app = create_router(Arc::new(state)).layer(GovernorLayer { config: governor });

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
