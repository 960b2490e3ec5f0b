//! Inference Context
//!
//! Immutable bundle of loaded artifacts and pipeline policy, created once at
//! startup and shared by every request.

use crate::engine::{Prediction, Predictor};
use crate::InferenceError;
use artifact_store::{ArtifactStore, Column};
use data_validator::{Normalizer, RawRecord, Validator};
use feature_engine::{CategoricalEncoder, Fallback, FallbackPolicy, FeatureVector, FeatureVectorizer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Everything one pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub prediction: Prediction,
    /// Scaled feature vector fed to the classifier
    pub features: FeatureVector,
    /// Columns that were absent and defaulted
    pub defaulted: Vec<Column>,
    /// Unseen categories that were substituted
    pub fallbacks: Vec<Fallback>,
    /// Plausibility warnings (advisory)
    pub warnings: Vec<String>,
    /// Pipeline latency in microseconds
    pub latency_us: u64,
}

/// Shared, read-only prediction pipeline
#[derive(Clone)]
pub struct InferenceContext {
    store: Arc<ArtifactStore>,
    policy: FallbackPolicy,
    validator: Arc<Validator>,
}

impl InferenceContext {
    /// Create a context over loaded artifacts
    pub fn new(store: Arc<ArtifactStore>, policy: FallbackPolicy) -> Self {
        info!("Creating inference context with {:?} fallback policy", policy);
        Self {
            store,
            policy,
            validator: Arc::new(Validator::default()),
        }
    }

    /// Replace the plausibility validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Run normalize, encode, vectorize and predict on one raw record
    pub fn predict(&self, raw: &RawRecord) -> Result<PipelineOutput, InferenceError> {
        let start = Instant::now();

        let normalized = Normalizer::new(&self.store).normalize_tracked(raw);
        let warnings = self.validator.check(&normalized.record).warnings();

        let encoded = CategoricalEncoder::new(&self.store, self.policy).encode_tracked(&normalized.record);
        let features = FeatureVectorizer::new(&self.store).vectorize(&encoded.record)?;
        let prediction = Predictor::new(self.store.classifier()).predict(features.values())?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            "Pipeline completed in {}us: label={} p={:.4} defaulted={} fallbacks={}",
            latency_us,
            prediction.label(),
            prediction.probability,
            normalized.defaulted.len(),
            encoded.fallbacks.len()
        );

        Ok(PipelineOutput {
            prediction,
            features,
            defaulted: normalized.defaulted,
            fallbacks: encoded.fallbacks,
            warnings,
            latency_us,
        })
    }

    /// Predict several records independently
    pub fn predict_batch(&self, records: &[RawRecord]) -> Vec<Result<PipelineOutput, InferenceError>> {
        debug!("Processing batch of {} records", records.len());
        records.iter().map(|raw| self.predict(raw)).collect()
    }
}
