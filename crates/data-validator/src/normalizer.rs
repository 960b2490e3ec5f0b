//! Input Normalization
//!
//! Maps raw field names onto the canonical schema and fills defaults for
//! absent columns. Never fails: at worst the record is all defaults.

use crate::record::{CanonicalRecord, FieldValue, RawRecord};
use artifact_store::{ArtifactStore, Column, ColumnKind};
use tracing::{debug, warn};

/// Lowercase residence key sent by web forms
const RESIDENCE_ALIAS: &str = "residence_type";

/// Result of normalizing one raw record
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub record: CanonicalRecord,
    /// Columns that were absent and received a non-null default
    pub defaulted: Vec<Column>,
}

/// Normalizer backed by the loaded artifacts
pub struct Normalizer<'a> {
    store: &'a ArtifactStore,
}

impl<'a> Normalizer<'a> {
    pub fn new(store: &'a ArtifactStore) -> Self {
        Self { store }
    }

    /// Normalize a raw record into a fully populated canonical record
    pub fn normalize(&self, raw: &RawRecord) -> CanonicalRecord {
        self.normalize_tracked(raw).record
    }

    /// Normalize and report which columns were defaulted
    pub fn normalize_tracked(&self, raw: &RawRecord) -> NormalizedRecord {
        let mut slots: [Option<FieldValue>; artifact_store::FEATURE_COUNT] =
            std::array::from_fn(|_| None);

        for (key, value) in raw.iter() {
            if key == RESIDENCE_ALIAS {
                continue;
            }
            if let Some(column) = Column::from_name(key) {
                slots[column.index()] = Some(FieldValue::from_json(value));
            }
        }
        // The lowercase variant wins over the canonical spelling
        if let Some(value) = raw.get(RESIDENCE_ALIAS) {
            slots[Column::ResidenceType.index()] = Some(FieldValue::from_json(value));
        }

        let mut record = CanonicalRecord::empty();
        let mut defaulted = Vec::new();
        for column in Column::ALL {
            match slots[column.index()].take() {
                Some(value) => record.set(column, value),
                None => match self.default_for(column) {
                    FieldValue::Null => debug!("Missing column {} in input data, no default", column),
                    value => {
                        warn!("Missing column {} in input data, using default {:?}", column, value);
                        record.set(column, value);
                        defaulted.push(column);
                    }
                },
            }
        }

        NormalizedRecord { record, defaulted }
    }

    /// Default value for an absent column
    pub fn default_for(&self, column: Column) -> FieldValue {
        match column.kind() {
            ColumnKind::BinaryFlag => FieldValue::Number(0.0),
            ColumnKind::Categorical => self
                .store
                .encoder(column)
                .map(|encoder| FieldValue::Text(encoder.first_class().to_string()))
                .unwrap_or(FieldValue::Null),
            ColumnKind::Continuous if column == Column::Bmi => {
                FieldValue::Number(self.store.bmi_mean())
            }
            // age and avg_glucose_level have no meaningful default
            ColumnKind::Continuous => FieldValue::Null,
        }
    }
}
