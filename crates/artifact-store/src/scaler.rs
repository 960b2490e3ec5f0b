//! Standard Scaler and Mean Imputer

use crate::error::ArtifactError;
use crate::schema::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

/// Fitted per-column affine transform: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column mean
    pub mean: Vec<f64>,
    /// Per-column standard deviation (1.0 for constant columns)
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler from fitted statistics
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Scaler that leaves values unchanged
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    /// Scale a single value of column `index`
    pub fn transform_value(&self, index: usize, value: f64) -> f64 {
        (value - self.mean[index]) / self.scale[index]
    }

    /// Scale a full feature row
    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        std::array::from_fn(|i| self.transform_value(i, row[i]))
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(ArtifactError::schema(
                "scaler",
                format!(
                    "expected {FEATURE_COUNT} columns, got mean={} scale={}",
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(ArtifactError::schema(
                "scaler",
                format!("mean of column {i} is not finite"),
            ));
        }
        if let Some(i) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(ArtifactError::schema(
                "scaler",
                format!("scale of column {i} must be finite and non-zero"),
            ));
        }
        Ok(())
    }
}

/// Fitted mean imputer for the `bmi` column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanImputer {
    /// Learned statistics, one per imputed column
    pub statistics: Vec<f64>,
}

impl MeanImputer {
    pub fn new(mean: f64) -> Self {
        Self {
            statistics: vec![mean],
        }
    }

    /// Learned mean of the imputed column
    pub fn mean(&self) -> f64 {
        self.statistics.first().copied().unwrap_or(f64::NAN)
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        match self.statistics.first() {
            Some(mean) if mean.is_finite() => Ok(()),
            Some(_) => Err(ArtifactError::schema("imputer", "statistic is not finite")),
            None => Err(ArtifactError::schema("imputer", "no statistics exported")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let mut scaler = StandardScaler::identity();
        scaler.mean[1] = 43.0;
        scaler.scale[1] = 22.5;

        let mut row = [0.0; FEATURE_COUNT];
        row[1] = 65.5;
        let scaled = scaler.transform(&row);
        assert!((scaled[1] - 1.0).abs() < 1e-12);
        assert_eq!(scaled[0], 0.0);
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let mut scaler = StandardScaler::identity();
        scaler.scale[3] = 0.0;
        assert!(scaler.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_width() {
        let scaler = StandardScaler::new(vec![0.0; 9], vec![1.0; 9]);
        assert!(scaler.validate().is_err());
    }

    #[test]
    fn test_imputer_mean() {
        let imputer: MeanImputer = serde_json::from_str(r#"{"statistics":[28.893]}"#).unwrap();
        assert!(imputer.validate().is_ok());
        assert!((imputer.mean() - 28.893).abs() < 1e-12);

        let empty = MeanImputer { statistics: vec![] };
        assert!(empty.validate().is_err());
    }
}
