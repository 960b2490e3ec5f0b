//! Artifact Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or validating trained artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Artifact file does not exist
    #[error("Missing {name} at {path}. Train the model and export its artifacts first")]
    Missing { name: &'static str, path: PathBuf },

    /// Artifact file could not be read
    #[error("Failed to read {name}: {source}")]
    Io {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for its type
    #[error("Failed to parse {name}: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact contents disagree with the feature schema
    #[error("Schema violation in {artifact}: {message}")]
    Schema {
        artifact: &'static str,
        message: String,
    },
}

impl ArtifactError {
    pub(crate) fn schema(artifact: &'static str, message: impl Into<String>) -> Self {
        ArtifactError::Schema {
            artifact,
            message: message.into(),
        }
    }
}
