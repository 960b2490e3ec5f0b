//! Plausibility Checks for Canonical Records
//!
//! Findings are advisory: a record outside the usual clinical ranges is
//! still predicted, the caller only gets warnings.

use crate::error::ValidationError;
use crate::record::{CanonicalRecord, FieldValue};
use artifact_store::{Column, ColumnKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Age valid range (years)
    pub age_range: (f64, f64),
    /// Average glucose level valid range (mg/dL)
    pub glucose_range: (f64, f64),
    /// BMI valid range (kg/m²)
    pub bmi_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            age_range: (0.0, 120.0),
            glucose_range: (40.0, 400.0),
            bmi_range: (10.0, 100.0),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Whether all values are plausible
    pub valid: bool,
    /// List of validation findings
    pub errors: Vec<ValidationError>,
    /// Number of fields checked
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Human-readable findings
    pub fn warnings(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Range and flag validator
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a 0/1 flag
    pub fn validate_flag(&self, field: &'static str, value: f64) -> Result<(), ValidationError> {
        if value == 0.0 || value == 1.0 {
            Ok(())
        } else {
            Err(ValidationError::InvalidFlag { field, value })
        }
    }

    /// Check every numeric column of a record; non-numeric values are left
    /// to the vectorizer
    pub fn check(&self, record: &CanonicalRecord) -> ValidationResult {
        let mut errors = Vec::new();
        let mut fields_checked = 0;

        for (column, value) in record.iter() {
            let FieldValue::Number(value) = *value else {
                continue;
            };
            let outcome = match (column, column.kind()) {
                (_, ColumnKind::BinaryFlag) => self.validate_flag(column.name(), value),
                (Column::Age, _) => self.validate_range("age", value, self.config.age_range),
                (Column::AvgGlucoseLevel, _) => {
                    self.validate_range("avg_glucose_level", value, self.config.glucose_range)
                }
                (Column::Bmi, _) => self.validate_range("bmi", value, self.config.bmi_range),
                _ => continue,
            };
            fields_checked += 1;
            if let Err(e) = outcome {
                debug!("Implausible input: {}", e);
                errors.push(e);
            }
        }

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            fields_checked,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: f64, glucose: f64, bmi: f64, hypertension: f64) -> CanonicalRecord {
        CanonicalRecord::empty()
            .with(Column::Age, age)
            .with(Column::AvgGlucoseLevel, glucose)
            .with(Column::Bmi, bmi)
            .with(Column::Hypertension, hypertension)
            .with(Column::HeartDisease, 0.0)
    }

    #[test]
    fn test_plausible_record() {
        let result = Validator::default().check(&record(67.0, 228.69, 36.6, 0.0));
        assert!(result.valid);
        assert_eq!(result.fields_checked, 5);
    }

    #[test]
    fn test_out_of_range_values() {
        let result = Validator::default().check(&record(150.0, 228.69, 3.0, 0.0));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.warnings()[0].contains("age"));
    }

    #[test]
    fn test_invalid_flag() {
        let result = Validator::default().check(&record(40.0, 90.0, 25.0, 2.0));
        assert!(matches!(
            result.errors[..],
            [ValidationError::InvalidFlag { field: "hypertension", .. }]
        ));
    }

    #[test]
    fn test_age_bounds_inclusive() {
        let validator = Validator::default();
        assert!(validator.validate_range("age", 0.0, (0.0, 120.0)).is_ok());
        assert!(validator.validate_range("age", 120.0, (0.0, 120.0)).is_ok());
        assert!(validator.validate_range("age", -1.0, (0.0, 120.0)).is_err());
    }
}
