//! Random Forest Classifier
//!
//! Trees are stored in the flat node-array layout exported from training:
//! node `i` is a leaf when `children_left[i] == -1`, otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left.

use crate::error::ArtifactError;
use crate::schema::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

/// Marker used for leaf children
const LEAF: i64 = -1;

/// Number of target classes (no-risk, risk)
pub const CLASS_COUNT: usize = 2;

/// A single fitted decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights `[class 0, class 1]`
    pub value: Vec<[f64; CLASS_COUNT]>,
}

impl DecisionTree {
    /// Tree with a single leaf
    pub fn leaf(weights: [f64; CLASS_COUNT]) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![weights],
        }
    }

    /// Tree with one split on `feature` and two leaves
    pub fn stump(
        feature: usize,
        threshold: f64,
        left: [f64; CLASS_COUNT],
        right: [f64; CLASS_COUNT],
    ) -> Self {
        let root = [left[0] + right[0], left[1] + right[1]];
        Self {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![feature as i64, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![root, left, right],
        }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Index of the leaf reached by `row`
    pub fn apply(&self, row: &[f64]) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            // Training compares features in single precision
            let x = row[feature] as f32 as f64;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Class probabilities at the leaf reached by `row`
    pub fn predict_proba(&self, row: &[f64]) -> [f64; CLASS_COUNT] {
        let weights = self.value[self.apply(row)];
        let total: f64 = weights.iter().sum();
        [weights[0] / total, weights[1] / total]
    }

    fn validate(&self, tree_idx: usize) -> Result<(), ArtifactError> {
        let fail = |message: String| {
            Err(ArtifactError::schema(
                "classifier",
                format!("tree {tree_idx}: {message}"),
            ))
        };

        let n = self.children_left.len();
        if n == 0 {
            return fail("has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return fail("node arrays have different lengths".into());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            let weights = self.value[node];
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return fail(format!("node {node} has invalid class weights"));
            }

            if left == LEAF {
                if right != LEAF {
                    return fail(format!("node {node} has only one child"));
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return fail(format!("leaf {node} has zero total weight"));
                }
                continue;
            }

            // Children must come after their parent, which rules out cycles
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return fail(format!("node {node} has out-of-order child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= FEATURE_COUNT as i64 {
                return fail(format!("node {node} splits on unknown feature {feature}"));
            }
            if self.threshold[node].is_nan() {
                return fail(format!("node {node} has NaN threshold"));
            }
        }
        Ok(())
    }
}

/// Ensemble of decision trees averaged by class probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    /// Number of input features the forest was fitted on
    pub n_features: usize,
    /// Class labels in probability order
    pub classes: Vec<u8>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(trees: Vec<DecisionTree>) -> Self {
        Self {
            n_features: FEATURE_COUNT,
            classes: vec![0, 1],
            trees,
        }
    }

    /// Mean of the per-tree class probabilities
    pub fn predict_proba(&self, row: &[f64]) -> [f64; CLASS_COUNT] {
        let mut sum = [0.0; CLASS_COUNT];
        for tree in &self.trees {
            let proba = tree.predict_proba(row);
            sum[0] += proba[0];
            sum[1] += proba[1];
        }
        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.n_features != FEATURE_COUNT {
            return Err(ArtifactError::schema(
                "classifier",
                format!(
                    "fitted on {} features, schema has {FEATURE_COUNT}",
                    self.n_features
                ),
            ));
        }
        if self.classes != [0, 1] {
            return Err(ArtifactError::schema(
                "classifier",
                format!("expected classes [0, 1], got {:?}", self.classes),
            ));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::schema("classifier", "forest has no trees"));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx)?;
        }
        Ok(())
    }
}
