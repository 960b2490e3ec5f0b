//! Repository Implementation

use crate::StorageError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, info};

/// Prediction to be stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrediction {
    pub user_id: i64,
    /// Input exactly as the user submitted it
    pub input: Value,
    pub label: u8,
    pub probability: f64,
}

/// Stored prediction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub user_id: i64,
    pub input: Value,
    pub label: u8,
    pub probability: f64,
    pub timestamp_ms: i64,
}

struct Inner {
    predictions: VecDeque<PredictionRecord>,
    next_id: i64,
}

/// Repository for prediction history (in-memory)
pub struct Repository {
    inner: Mutex<Inner>,
    /// Max prediction records kept across all users
    max_prediction_records: usize,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Create a repository keeping at most `max_records` predictions
    pub fn with_capacity(max_records: usize) -> Self {
        info!("Creating in-memory prediction repository (max {} records)", max_records);
        Self {
            inner: Mutex::new(Inner {
                predictions: VecDeque::with_capacity(max_records.min(1024)),
                next_id: 1,
            }),
            max_prediction_records: max_records.max(1),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))
    }

    /// Insert a prediction, returning its id
    pub fn insert_prediction(&self, prediction: NewPrediction) -> Result<i64, StorageError> {
        let mut inner = self.lock()?;

        let id = inner.next_id;
        inner.next_id += 1;

        // Enforce retention
        while inner.predictions.len() >= self.max_prediction_records {
            inner.predictions.pop_front();
        }

        inner.predictions.push_back(PredictionRecord {
            id,
            user_id: prediction.user_id,
            input: prediction.input,
            label: prediction.label,
            probability: prediction.probability,
            timestamp_ms: now_ms(),
        });
        debug!("Inserted prediction {} for user {}", id, prediction.user_id);

        Ok(id)
    }

    /// A user's predictions, newest first
    pub fn get_user_predictions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<PredictionRecord>, StorageError> {
        let inner = self.lock()?;
        Ok(inner
            .predictions
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    /// One prediction, only if it belongs to `user_id`
    pub fn get_prediction(&self, id: i64, user_id: i64) -> Result<PredictionRecord, StorageError> {
        let inner = self.lock()?;
        inner
            .predictions
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned()
            .ok_or(StorageError::NotFound { id, user_id })
    }

    /// Get total prediction count
    pub fn prediction_count(&self) -> usize {
        self.lock().map(|inner| inner.predictions.len()).unwrap_or(0)
    }

    /// Clear all data (for testing)
    pub fn clear(&self) {
        if let Ok(mut inner) = self.lock() {
            inner.predictions.clear();
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
