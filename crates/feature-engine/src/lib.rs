//! Feature Engineering Engine
//!
//! Encodes categorical columns and assembles the scaled feature vector the
//! classifier consumes.

mod encoder;
mod features;

pub use encoder::{CategoricalEncoder, EncodedRecord, Fallback, FallbackPolicy};
pub use features::{FeatureVector, FeatureVectorizer};

use artifact_store::Column;
use thiserror::Error;

/// Errors while turning a record into numbers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("{column} value {value:?} is not numeric")]
    NotNumeric { column: Column, value: String },
    #[error("Missing value for {0}")]
    MissingValue(Column),
    #[error("{0} was not label-encoded before vectorization")]
    NotEncoded(Column),
}
