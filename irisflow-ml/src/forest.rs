//! Random forest classifier.
//!
//! A from-scratch ensemble of CART decision trees: each tree is grown on
//! a bootstrap sample of the training rows, each split considers a random
//! subset of sqrt(n_features) columns, and prediction is a majority vote
//! across trees. Splits minimize weighted Gini impurity over thresholds
//! taken at midpoints of consecutive distinct feature values.
//!
//! Everything is seeded: the same [`ForestConfig`] on the same data
//! always produces the same forest, which keeps training runs and their
//! logged metrics reproducible.

use irisflow_core::ModelConfig;
use irisflow_core::error::{ModelError, Result};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hyperparameters for [`ForestClassifier::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            seed: default_seed(),
        }
    }
}

impl From<&ModelConfig> for ForestConfig {
    fn from(model: &ModelConfig) -> Self {
        Self {
            n_estimators: model.n_estimators,
            max_depth: model.max_depth,
            seed: model.seed,
            ..Self::default()
        }
    }
}

fn default_n_estimators() -> usize {
    100
}

fn default_min_samples_split() -> usize {
    2
}

fn default_seed() -> u64 {
    42
}

/// One node of a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        label: i64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, features: &[f64]) -> i64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { label } => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    fn fit(
        x: &Array2<f64>,
        y: &[i64],
        indices: &[usize],
        candidates: usize,
        config: &ForestConfig,
        rng: &mut SmallRng,
    ) -> Self {
        Self {
            root: grow(x, y, indices, 0, candidates, config, rng),
        }
    }
}

/// A fitted random forest.
///
/// Forests serialize to plain JSON, so a trained model round-trips
/// through the catalog or any file without a custom format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    n_features: usize,
    config: ForestConfig,
}

impl ForestClassifier {
    /// Train a forest on `x` (rows are samples) and integer labels `y`.
    pub fn fit(x: &Array2<f64>, y: &[i64], config: &ForestConfig) -> Result<Self> {
        if x.nrows() == 0 || y.is_empty() {
            return Err(ModelError::EmptyTraining.into());
        }
        if x.nrows() != y.len() {
            return Err(ModelError::LabelMismatch {
                rows: x.nrows(),
                labels: y.len(),
            }
            .into());
        }

        let n_rows = x.nrows();
        let n_features = x.ncols();
        let candidates = ((n_features as f64).sqrt().ceil() as usize).max(1);

        let mut trees = Vec::with_capacity(config.n_estimators);
        for i in 0..config.n_estimators {
            let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(i as u64));
            let indices: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
            trees.push(DecisionTree::fit(x, y, &indices, candidates, config, &mut rng));
        }

        Ok(Self {
            trees,
            n_features,
            config: config.clone(),
        })
    }

    /// A degenerate forest that predicts class 0 for any input. Used as
    /// the serving fallback when no trained model can be loaded.
    pub fn untrained_stub(n_features: usize) -> Self {
        Self {
            trees: vec![DecisionTree {
                root: TreeNode::Leaf { label: 0 },
            }],
            n_features,
            config: ForestConfig {
                n_estimators: 1,
                ..ForestConfig::default()
            },
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Predict the class of a single sample.
    pub fn predict_one(&self, features: &[f64]) -> Result<i64> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureWidth {
                expected: self.n_features,
                actual: features.len(),
            }
            .into());
        }
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted.into());
        }
        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.root.predict(features)).or_insert(0) += 1;
        }
        Ok(majority(&votes).unwrap_or(0))
    }

    /// Predict classes for every row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<i64>> {
        let mut out = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            out.push(self.predict_one(&row.to_vec())?);
        }
        Ok(out)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

// ---------------------------------------------------------------------------
// Tree growing
// ---------------------------------------------------------------------------

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

fn grow(
    x: &Array2<f64>,
    y: &[i64],
    indices: &[usize],
    depth: usize,
    candidates: usize,
    config: &ForestConfig,
    rng: &mut SmallRng,
) -> TreeNode {
    let counts = label_counts(y, indices);
    let node_label = majority(&counts).unwrap_or(0);
    if counts.len() <= 1 {
        return TreeNode::Leaf { label: node_label };
    }
    if indices.len() < config.min_samples_split {
        return TreeNode::Leaf { label: node_label };
    }
    if let Some(max_depth) = config.max_depth {
        if depth >= max_depth {
            return TreeNode::Leaf { label: node_label };
        }
    }

    let node_score = gini(&counts, indices.len());
    let best = match best_split(x, y, indices, candidates, rng) {
        Some(best) if best.score < node_score => best,
        _ => return TreeNode::Leaf { label: node_label },
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[[i, best.feature]] <= best.threshold);

    TreeNode::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(grow(x, y, &left, depth + 1, candidates, config, rng)),
        right: Box::new(grow(x, y, &right, depth + 1, candidates, config, rng)),
    }
}

/// Lowest weighted-Gini split over a random feature subset, or `None`
/// when no candidate feature produces a two-sided partition.
fn best_split(
    x: &Array2<f64>,
    y: &[i64],
    indices: &[usize],
    candidates: usize,
    rng: &mut SmallRng,
) -> Option<SplitCandidate> {
    let n_features = x.ncols();
    let total = indices.len();
    let mut best: Option<SplitCandidate> = None;

    for feature in sample(rng, n_features, candidates.min(n_features)) {
        let mut values: Vec<f64> = indices.iter().map(|&i| x[[i, feature]]).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let mut left: BTreeMap<i64, usize> = BTreeMap::new();
            let mut right: BTreeMap<i64, usize> = BTreeMap::new();
            for &i in indices {
                let side = if x[[i, feature]] <= threshold {
                    &mut left
                } else {
                    &mut right
                };
                *side.entry(y[i]).or_insert(0) += 1;
            }
            let n_left: usize = left.values().sum();
            let n_right: usize = right.values().sum();
            if n_left == 0 || n_right == 0 {
                continue;
            }
            let score = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / total as f64;
            if best.as_ref().is_none_or(|b| score < b.score) {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    score,
                });
            }
        }
    }
    best
}

fn label_counts(y: &[i64], indices: &[usize]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for &i in indices {
        *counts.entry(y[i]).or_insert(0) += 1;
    }
    counts
}

/// Gini impurity of a label distribution.
fn gini(counts: &BTreeMap<i64, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts
        .values()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

/// Most common label; ties go to the smallest label.
fn majority(votes: &BTreeMap<i64, usize>) -> Option<i64> {
    let mut best: Option<(i64, usize)> = None;
    for (&label, &count) in votes {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}
