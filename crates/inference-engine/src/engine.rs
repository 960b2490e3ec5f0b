//! Predictor Implementation

use crate::InferenceError;
use artifact_store::{RandomForest, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskClass {
    /// Class 0
    NoRisk,
    /// Class 1
    Risk,
}

impl RiskClass {
    /// Integer label as used in training
    pub fn label(&self) -> u8 {
        match self {
            RiskClass::NoRisk => 0,
            RiskClass::Risk => 1,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskClass::NoRisk => "no_stroke_risk",
            RiskClass::Risk => "stroke_risk",
        }
    }
}

/// Prediction result from inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class
    pub class: RiskClass,
    /// Probability of the risk class (0.0 to 1.0)
    pub probability: f64,
    /// Probabilities for each class
    pub probabilities: [f64; 2],
}

impl Prediction {
    /// 0 or 1
    pub fn label(&self) -> u8 {
        self.class.label()
    }

    /// Risk probability as a percentage, rounded to two decimals
    pub fn risk_percent(&self) -> f64 {
        (self.probability * 10_000.0).round() / 100.0
    }
}

/// Runs the fitted classifier on scaled feature vectors
pub struct Predictor<'a> {
    classifier: &'a RandomForest,
}

impl<'a> Predictor<'a> {
    pub fn new(classifier: &'a RandomForest) -> Self {
        Self { classifier }
    }

    /// Predict class and risk probability for one scaled vector
    pub fn predict(&self, vector: &[f64]) -> Result<Prediction, InferenceError> {
        if vector.len() != FEATURE_COUNT {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {FEATURE_COUNT}]"),
                actual: format!("[1, {}]", vector.len()),
            });
        }

        let probabilities = self.classifier.predict_proba(vector);
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::InferenceFailed(format!(
                "classifier produced non-finite probabilities {probabilities:?}"
            )));
        }

        // Ties go to the first class
        let class = if probabilities[1] > probabilities[0] {
            RiskClass::Risk
        } else {
            RiskClass::NoRisk
        };
        let probability = probabilities[1].clamp(0.0, 1.0);

        debug!(
            "Prediction: {} (p={:.4}) over {} trees",
            class.as_str(),
            probability,
            self.classifier.trees.len()
        );

        Ok(Prediction {
            class,
            probability,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_store::DecisionTree;

    fn forest() -> RandomForest {
        RandomForest::new(vec![
            DecisionTree::stump(1, 1.0, [9.0, 1.0], [1.0, 3.0]),
            DecisionTree::stump(7, 2.0, [8.0, 2.0], [2.0, 8.0]),
        ])
    }

    #[test]
    fn test_low_risk_prediction() {
        let forest = forest();
        let prediction = Predictor::new(&forest).predict(&[0.0; FEATURE_COUNT]).unwrap();
        assert_eq!(prediction.class, RiskClass::NoRisk);
        assert_eq!(prediction.label(), 0);
        assert!((prediction.probability - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_high_risk_prediction() {
        let forest = forest();
        let mut vector = [0.0; FEATURE_COUNT];
        vector[1] = 1.5;
        vector[7] = 2.7;
        let prediction = Predictor::new(&forest).predict(&vector).unwrap();
        assert_eq!(prediction.label(), 1);
        assert!((prediction.probability - 0.775).abs() < 1e-12);
        assert_eq!(prediction.risk_percent(), 77.5);
    }

    #[test]
    fn test_tie_goes_to_no_risk() {
        let forest = RandomForest::new(vec![DecisionTree::leaf([1.0, 1.0])]);
        let prediction = Predictor::new(&forest).predict(&[0.0; FEATURE_COUNT]).unwrap();
        assert_eq!(prediction.class, RiskClass::NoRisk);
        assert_eq!(prediction.probability, 0.5);
    }

    #[test]
    fn test_shape_mismatch() {
        let forest = forest();
        let err = Predictor::new(&forest).predict(&[0.0; 9]).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidInputShape { .. }));
    }
}
