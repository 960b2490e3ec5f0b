//! Storage Layer
//!
//! Keeps each user's prediction history behind a repository interface.

mod repository;

pub use repository::{NewPrediction, PredictionRecord, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Prediction {id} not found for user {user_id}")]
    NotFound { id: i64, user_id: i64 },
}
