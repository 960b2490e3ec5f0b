//! Feature Schema
//!
//! The fixed, ordered set of feature columns the scaler and classifier were
//! fitted on. Every stage of the pipeline indexes records through [`Column`],
//! so column order lives in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of feature columns
pub const FEATURE_COUNT: usize = 10;

/// Schema version, bumped whenever column order or kinds change
pub const SCHEMA_VERSION: &str = "stroke-v1";

/// Semantic kind of a feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Text category mapped through a label encoder
    Categorical,
    /// 0/1 integer flag
    BinaryFlag,
    /// Real-valued measurement
    Continuous,
}

/// Feature column, declared in model order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    Gender,
    Age,
    Hypertension,
    HeartDisease,
    EverMarried,
    WorkType,
    ResidenceType,
    AvgGlucoseLevel,
    Bmi,
    SmokingStatus,
}

impl Column {
    /// All columns in model order
    pub const ALL: [Column; FEATURE_COUNT] = [
        Column::Gender,
        Column::Age,
        Column::Hypertension,
        Column::HeartDisease,
        Column::EverMarried,
        Column::WorkType,
        Column::ResidenceType,
        Column::AvgGlucoseLevel,
        Column::Bmi,
        Column::SmokingStatus,
    ];

    /// Categorical columns, in the order they are encoded
    pub const CATEGORICAL: [Column; 5] = [
        Column::Gender,
        Column::EverMarried,
        Column::WorkType,
        Column::ResidenceType,
        Column::SmokingStatus,
    ];

    /// Canonical column name as used in training data
    pub fn name(&self) -> &'static str {
        match self {
            Column::Gender => "gender",
            Column::Age => "age",
            Column::Hypertension => "hypertension",
            Column::HeartDisease => "heart_disease",
            Column::EverMarried => "ever_married",
            Column::WorkType => "work_type",
            Column::ResidenceType => "Residence_type",
            Column::AvgGlucoseLevel => "avg_glucose_level",
            Column::Bmi => "bmi",
            Column::SmokingStatus => "smoking_status",
        }
    }

    /// Semantic kind of this column
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Gender
            | Column::EverMarried
            | Column::WorkType
            | Column::ResidenceType
            | Column::SmokingStatus => ColumnKind::Categorical,
            Column::Hypertension | Column::HeartDisease => ColumnKind::BinaryFlag,
            Column::Age | Column::AvgGlucoseLevel | Column::Bmi => ColumnKind::Continuous,
        }
    }

    /// Position in the feature vector
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look up a column by its canonical name
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Whether values of this column go through a label encoder
    pub fn is_categorical(&self) -> bool {
        self.kind() == ColumnKind::Categorical
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptor of one column in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub column: Column,
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Ordered feature schema shared by every pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema;

impl FeatureSchema {
    /// Schema version string
    pub fn version(&self) -> &'static str {
        SCHEMA_VERSION
    }

    /// Column descriptors in model order
    pub fn columns(&self) -> impl Iterator<Item = ColumnDescriptor> {
        Column::ALL.into_iter().map(|column| ColumnDescriptor {
            column,
            name: column.name(),
            kind: column.kind(),
        })
    }

    /// Canonical column names in model order
    pub fn names(&self) -> [&'static str; FEATURE_COUNT] {
        Column::ALL.map(|c| c.name())
    }

    /// Number of feature columns
    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        false
    }
}
