//! Prediction Routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use data_validator::RawRecord;
use feature_engine::Fallback;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{NewPrediction, PredictionRecord};

use crate::error::ApiError;
use crate::AppState;

/// Request body for the predict endpoint
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub user_id: i64,
    pub input: RawRecord,
}

/// Response for the predict endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub id: i64,
    pub label: u8,
    pub class: String,
    pub probability: f64,
    pub risk_percent: f64,
    /// Columns filled with defaults
    pub defaulted: Vec<String>,
    pub fallbacks: Vec<FallbackInfo>,
    pub warnings: Vec<String>,
}

/// Unseen category substitution, as reported to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct FallbackInfo {
    pub column: String,
    pub original: Option<String>,
    pub substituted: String,
}

impl From<Fallback> for FallbackInfo {
    fn from(fallback: Fallback) -> Self {
        Self {
            column: fallback.column.name().to_string(),
            original: fallback.original,
            substituted: fallback.substituted,
        }
    }
}

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for the history endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub data: Vec<PredictionRecord>,
    pub count: usize,
}

/// Run the pipeline and store the result in the user's history
pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<(StatusCode, Json<PredictResponse>), ApiError> {
    let output = state.context.predict(&request.input)?;
    let prediction = output.prediction;

    metrics::counter!("predictions_total", "class" => prediction.class.as_str()).increment(1);
    metrics::counter!("prediction_fallbacks_total").increment(output.fallbacks.len() as u64);
    metrics::counter!("prediction_defaults_total").increment(output.defaulted.len() as u64);
    metrics::histogram!("prediction_latency_us").record(output.latency_us as f64);

    let input = serde_json::to_value(&request.input).map_err(|e| ApiError::Internal(e.to_string()))?;
    let id = state.repository.insert_prediction(NewPrediction {
        user_id: request.user_id,
        input,
        label: prediction.label(),
        probability: prediction.probability,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(PredictResponse {
            id,
            label: prediction.label(),
            class: prediction.class.as_str().to_string(),
            probability: prediction.probability,
            risk_percent: prediction.risk_percent(),
            defaulted: output.defaulted.iter().map(|c| c.name().to_string()).collect(),
            fallbacks: output.fallbacks.into_iter().map(FallbackInfo::from).collect(),
            warnings: output.warnings,
        }),
    ))
}

/// Get a user's predictions, newest first
pub async fn get_user_predictions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = params.limit.min(500);
    let data = state.repository.get_user_predictions(user_id, limit)?;

    Ok(Json(HistoryResponse {
        count: data.len(),
        data,
    }))
}

/// Get a single prediction owned by the user
pub async fn get_prediction(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(i64, i64)>,
) -> Result<Json<PredictionRecord>, ApiError> {
    Ok(Json(state.repository.get_prediction(id, user_id)?))
}
