//! Input Normalization and Validation
//!
//! Turns raw, loosely-structured input records into canonical records with
//! exactly one value per feature column.

mod error;
mod normalizer;
mod record;
mod validator;

pub use error::ValidationError;
pub use normalizer::{NormalizedRecord, Normalizer};
pub use record::{CanonicalRecord, FieldValue, RawRecord};
pub use validator::{ValidationConfig, ValidationResult, Validator};
