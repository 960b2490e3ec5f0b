//! Validation Error Types

use thiserror::Error;

/// Plausibility findings on an input record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of the usual range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Binary flag is neither 0 nor 1
    #[error("{field} flag must be 0 or 1, got {value}")]
    InvalidFlag { field: &'static str, value: f64 },
}
