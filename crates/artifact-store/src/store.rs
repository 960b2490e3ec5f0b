//! Artifact Store
//!
//! Loads the four trained artifacts once at startup and validates them
//! against the feature schema. The store is immutable after construction.

use crate::encoder::LabelEncoder;
use crate::error::ArtifactError;
use crate::forest::RandomForest;
use crate::scaler::{MeanImputer, StandardScaler};
use crate::schema::{Column, FeatureSchema};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Classifier file name
pub const CLASSIFIER_FILE: &str = "stroke_model.json";
/// Scaler file name
pub const SCALER_FILE: &str = "scaler.json";
/// Label encoder mapping file name
pub const ENCODERS_FILE: &str = "label_encoders.json";
/// Imputer file name
pub const IMPUTER_FILE: &str = "imputer.json";

/// Artifact files in load order
pub const ARTIFACT_FILES: [&str; 4] = [CLASSIFIER_FILE, SCALER_FILE, ENCODERS_FILE, IMPUTER_FILE];

/// Trained artifacts shared read-only by every prediction
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    classifier: RandomForest,
    scaler: StandardScaler,
    encoders: BTreeMap<Column, LabelEncoder>,
    imputer: MeanImputer,
    source: Option<PathBuf>,
}

impl ArtifactStore {
    /// Load and validate all artifacts from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        info!("Loading model artifacts from {}", dir.display());

        // Fail before parsing anything if a file is absent
        for name in ARTIFACT_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(ArtifactError::Missing { name, path });
            }
        }

        let classifier: RandomForest = read_json(dir, CLASSIFIER_FILE)?;
        let scaler: StandardScaler = read_json(dir, SCALER_FILE)?;
        let raw_encoders: BTreeMap<String, LabelEncoder> = read_json(dir, ENCODERS_FILE)?;
        let imputer: MeanImputer = read_json(dir, IMPUTER_FILE)?;

        let mut encoders = BTreeMap::new();
        for (name, encoder) in raw_encoders {
            let column = Column::from_name(&name).ok_or_else(|| {
                ArtifactError::schema("label_encoders", format!("unknown column {name}"))
            })?;
            encoders.insert(column, encoder);
        }

        let mut store = Self::from_parts(classifier, scaler, encoders, imputer)?;
        store.source = Some(dir.to_path_buf());

        info!(
            "Artifacts ready: {} trees, schema {}, bmi mean {:.3}",
            store.classifier.trees.len(),
            store.schema().version(),
            store.bmi_mean()
        );
        Ok(store)
    }

    /// Build a store from in-memory artifacts, validating them
    pub fn from_parts(
        classifier: RandomForest,
        scaler: StandardScaler,
        encoders: BTreeMap<Column, LabelEncoder>,
        imputer: MeanImputer,
    ) -> Result<Self, ArtifactError> {
        let store = Self {
            classifier,
            scaler,
            encoders,
            imputer,
            source: None,
        };
        store.validate()?;
        Ok(store)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        for column in Column::CATEGORICAL {
            let encoder = self.encoders.get(&column).ok_or_else(|| {
                ArtifactError::schema("label_encoders", format!("no encoder for {column}"))
            })?;
            encoder.validate(column.name())?;
        }
        if let Some(extra) = self.encoders.keys().find(|c| !c.is_categorical()) {
            return Err(ArtifactError::schema(
                "label_encoders",
                format!("{extra} is not a categorical column"),
            ));
        }
        self.scaler.validate()?;
        self.imputer.validate()?;
        self.classifier.validate()?;
        debug!("Artifacts match schema {}", self.schema().version());
        Ok(())
    }

    /// Feature schema the artifacts were validated against
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema
    }

    pub fn classifier(&self) -> &RandomForest {
        &self.classifier
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn imputer(&self) -> &MeanImputer {
        &self.imputer
    }

    /// All label encoders by column
    pub fn encoders(&self) -> &BTreeMap<Column, LabelEncoder> {
        &self.encoders
    }

    /// Label encoder for a categorical column
    pub fn encoder(&self, column: Column) -> Option<&LabelEncoder> {
        self.encoders.get(&column)
    }

    /// Learned `bmi` mean
    pub fn bmi_mean(&self) -> f64 {
        self.imputer.mean()
    }

    /// Directory the artifacts were loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &'static str) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(dir.join(name)).map_err(|source| ArtifactError::Io { name, source })?;
    let value = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { name, source })?;
    info!("Loaded {} ({} bytes)", name, bytes.len());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::DecisionTree;

    fn encoders() -> BTreeMap<Column, LabelEncoder> {
        let mut map = BTreeMap::new();
        map.insert(Column::Gender, LabelEncoder::fit(["Female", "Male", "Other"]));
        map.insert(Column::EverMarried, LabelEncoder::fit(["No", "Yes"]));
        map.insert(
            Column::WorkType,
            LabelEncoder::fit(["Govt_job", "Never_worked", "Private", "Self-employed", "children"]),
        );
        map.insert(Column::ResidenceType, LabelEncoder::fit(["Rural", "Urban"]));
        map.insert(
            Column::SmokingStatus,
            LabelEncoder::fit(["Unknown", "formerly smoked", "never smoked", "smokes"]),
        );
        map
    }

    fn forest() -> RandomForest {
        RandomForest::new(vec![DecisionTree::leaf([9.0, 1.0])])
    }

    #[test]
    fn test_from_parts_valid() {
        let store = ArtifactStore::from_parts(
            forest(),
            StandardScaler::identity(),
            encoders(),
            MeanImputer::new(28.9),
        )
        .unwrap();
        assert_eq!(store.encoder(Column::Gender).unwrap().first_class(), "Female");
        assert!(store.encoder(Column::Age).is_none());
        assert!(store.source().is_none());
    }

    #[test]
    fn test_from_parts_missing_encoder() {
        let mut encoders = encoders();
        encoders.remove(&Column::WorkType);
        let err = ArtifactStore::from_parts(
            forest(),
            StandardScaler::identity(),
            encoders,
            MeanImputer::new(28.9),
        )
        .unwrap_err();
        assert!(err.to_string().contains("work_type"));
    }

    #[test]
    fn test_from_parts_rejects_encoder_on_numeric_column() {
        let mut encoders = encoders();
        encoders.insert(Column::Age, LabelEncoder::fit(["1"]));
        assert!(ArtifactStore::from_parts(
            forest(),
            StandardScaler::identity(),
            encoders,
            MeanImputer::new(28.9),
        )
        .is_err());
    }
}
