//! Feature Vector Assembly

use crate::FeatureError;
use artifact_store::{ArtifactStore, Column, ColumnKind, FEATURE_COUNT};
use data_validator::{CanonicalRecord, FieldValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature vector for ML inference, in schema column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Encoded, imputed values before scaling
    pub raw: [f64; FEATURE_COUNT],
    /// Values after the fitted scaler
    pub scaled: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Scaled values, the classifier's input
    pub fn values(&self) -> &[f64] {
        &self.scaled
    }

    /// Unscaled value of one column
    pub fn raw_value(&self, column: Column) -> f64 {
        self.raw[column.index()]
    }
}

/// Orders, imputes and scales an encoded record
pub struct FeatureVectorizer<'a> {
    store: &'a ArtifactStore,
}

impl<'a> FeatureVectorizer<'a> {
    pub fn new(store: &'a ArtifactStore) -> Self {
        Self { store }
    }

    /// Build the scaled feature vector
    pub fn vectorize(&self, record: &CanonicalRecord) -> Result<FeatureVector, FeatureError> {
        let mut raw = [0.0; FEATURE_COUNT];
        for column in Column::ALL {
            raw[column.index()] = self.numeric_value(column, record.get(column))?;
        }

        let scaled = self.store.scaler().transform(&raw);
        debug!("Vectorized record: raw={:?}", raw);

        Ok(FeatureVector { raw, scaled })
    }

    fn numeric_value(&self, column: Column, value: &FieldValue) -> Result<f64, FeatureError> {
        let number = match value {
            FieldValue::Code(code) => *code as f64,
            FieldValue::Text(_) if column.kind() == ColumnKind::Categorical => {
                return Err(FeatureError::NotEncoded(column));
            }
            FieldValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                FeatureError::NotNumeric {
                    column,
                    value: text.clone(),
                }
            })?,
            FieldValue::Number(n) => *n,
            // bmi supplied explicitly as null or empty
            FieldValue::Null if column == Column::Bmi => self.store.bmi_mean(),
            FieldValue::Null => return Err(FeatureError::MissingValue(column)),
        };

        if number.is_finite() {
            Ok(number)
        } else {
            Err(FeatureError::NotNumeric {
                column,
                value: number.to_string(),
            })
        }
    }
}
