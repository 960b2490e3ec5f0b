//! Label Encoders for Categorical Columns

use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};

/// Fitted label encoder: known categories in ascending order, code = index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Known categories, sorted ascending
    classes: Vec<String>,
    /// Training frequency of each class, when exported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    counts: Option<Vec<u64>>,
}

impl LabelEncoder {
    /// Fit an encoder over a set of categories, sorting and deduplicating them
    pub fn fit<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = categories.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self {
            classes,
            counts: None,
        }
    }

    /// Attach per-class training counts (same order as `classes`)
    pub fn with_counts(mut self, counts: Vec<u64>) -> Self {
        self.counts = Some(counts);
        self
    }

    /// Known categories in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Per-class training counts, if exported
    pub fn counts(&self) -> Option<&[u64]> {
        self.counts.as_deref()
    }

    /// Lexicographically-first known category (code 0)
    pub fn first_class(&self) -> &str {
        // Non-empty is checked in `validate`
        self.classes.first().map(String::as_str).unwrap_or_default()
    }

    /// Class with the highest training count, ties broken by smallest code
    pub fn most_frequent_class(&self) -> Option<&str> {
        let counts = self.counts.as_ref()?;
        let mut best: Option<(usize, u64)> = None;
        for (idx, &count) in counts.iter().enumerate() {
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((idx, count)),
            }
        }
        best.map(|(idx, _)| self.classes[idx].as_str())
    }

    /// Whether `value` is a known category
    pub fn contains(&self, value: &str) -> bool {
        self.code(value).is_some()
    }

    /// Integer code of a known category
    pub fn code(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
    }

    /// Check encoder invariants: non-empty, strictly ascending, counts aligned
    pub(crate) fn validate(&self, column: &str) -> Result<(), ArtifactError> {
        if self.classes.is_empty() {
            return Err(ArtifactError::schema(
                "label_encoders",
                format!("encoder for {column} has no classes"),
            ));
        }
        if let Some(pair) = self.classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ArtifactError::schema(
                "label_encoders",
                format!(
                    "classes for {column} are not strictly ascending ({:?} before {:?})",
                    pair[0], pair[1]
                ),
            ));
        }
        if let Some(counts) = &self.counts {
            if counts.len() != self.classes.len() {
                return Err(ArtifactError::schema(
                    "label_encoders",
                    format!(
                        "encoder for {column} has {} classes but {} counts",
                        self.classes.len(),
                        counts.len()
                    ),
                ));
            }
        }
        Ok(())
    }
}
