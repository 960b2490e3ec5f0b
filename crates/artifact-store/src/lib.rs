//! Trained Model Artifacts
//!
//! Loads the classifier, scaler, label encoders and bmi imputer produced by
//! training, and defines the feature schema they must agree on.

mod encoder;
mod error;
mod forest;
mod scaler;
mod schema;
mod store;

pub use encoder::LabelEncoder;
pub use error::ArtifactError;
pub use forest::{DecisionTree, RandomForest, CLASS_COUNT};
pub use scaler::{MeanImputer, StandardScaler};
pub use schema::{Column, ColumnDescriptor, ColumnKind, FeatureSchema, FEATURE_COUNT, SCHEMA_VERSION};
pub use store::{
    ArtifactStore, ARTIFACT_FILES, CLASSIFIER_FILE, ENCODERS_FILE, IMPUTER_FILE, SCALER_FILE,
};
