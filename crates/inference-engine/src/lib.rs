//! Stroke-Risk Inference Engine
//!
//! Runs the random-forest classifier and wires the full
//! normalize → encode → vectorize → predict pipeline.

mod context;
mod engine;

pub use context::{InferenceContext, PipelineOutput};
pub use engine::{Prediction, Predictor, RiskClass};

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Feature preparation failed: {0}")]
    Feature(#[from] FeatureError),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}
