//! Categorical Encoding with Unseen-Category Fallback

use artifact_store::{ArtifactStore, Column, LabelEncoder};
use data_validator::{CanonicalRecord, FieldValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which known category replaces a value the encoder has never seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Lexicographically-first known category (code 0)
    #[default]
    FirstClass,
    /// Category with the highest training count; first class when the
    /// encoder was exported without counts
    MostFrequent,
}

/// One unseen value that was substituted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fallback {
    pub column: Column,
    /// Value as supplied, `None` for null
    pub original: Option<String>,
    pub substituted: String,
}

/// Encoded record plus the substitutions made
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    pub record: CanonicalRecord,
    pub fallbacks: Vec<Fallback>,
}

/// Maps categorical text to the integer codes the classifier was fitted on
pub struct CategoricalEncoder<'a> {
    store: &'a ArtifactStore,
    policy: FallbackPolicy,
}

impl<'a> CategoricalEncoder<'a> {
    pub fn new(store: &'a ArtifactStore, policy: FallbackPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Replace every categorical column with its code
    pub fn encode(&self, record: &CanonicalRecord) -> CanonicalRecord {
        self.encode_tracked(record).record
    }

    /// Encode and report fallback substitutions
    pub fn encode_tracked(&self, record: &CanonicalRecord) -> EncodedRecord {
        let mut encoded = record.clone();
        let mut fallbacks = Vec::new();
        let mut warned_counts = false;

        for column in Column::CATEGORICAL {
            let Some(encoder) = self.store.encoder(column) else {
                // Unreachable for a validated store
                continue;
            };
            let value = record.get(column);
            // Already encoded
            if let FieldValue::Code(code) = value {
                if *code < encoder.classes().len() {
                    continue;
                }
            }
            let category = value.as_category();

            let code = match category.as_deref().and_then(|c| encoder.code(c)) {
                Some(code) => code,
                None => {
                    let substituted = self.fallback_class(encoder, &mut warned_counts);
                    debug!(
                        "Unseen {} value {:?}, substituting {:?}",
                        column, category, substituted
                    );
                    fallbacks.push(Fallback {
                        column,
                        original: category.map(|c| c.into_owned()),
                        substituted: substituted.to_string(),
                    });
                    // A fallback class always comes from the encoder's own classes
                    encoder.code(substituted).unwrap_or(0)
                }
            };
            encoded.set(column, FieldValue::Code(code));
        }

        EncodedRecord {
            record: encoded,
            fallbacks,
        }
    }

    fn fallback_class<'e>(&self, encoder: &'e LabelEncoder, warned: &mut bool) -> &'e str {
        match self.policy {
            FallbackPolicy::FirstClass => encoder.first_class(),
            FallbackPolicy::MostFrequent => match encoder.most_frequent_class() {
                Some(class) => class,
                None => {
                    if !*warned {
                        warn!("Encoder has no class counts, falling back to first class");
                        *warned = true;
                    }
                    encoder.first_class()
                }
            },
        }
    }
}
