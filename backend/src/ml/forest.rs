//! Random forest regressor
//!
//! Bagged ensemble of [`RegressionTree`]s. Each tree is fitted on a
//! bootstrap resample of the training rows with its own seed drawn from the
//! forest seed, so a fixed seed reproduces the same forest. Prediction is
//! the mean of the tree outputs.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};

/// Ensemble settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub tree: TreeParams,
    /// Resample rows with replacement for each tree
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeParams::default(),
            bootstrap: true,
            seed: 42,
        }
    }
}

/// A fitted random forest regressor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fit a forest on `rows` against `targets`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `n_estimators` is zero or the data cannot be fitted.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], params: &ForestParams) -> Result<Self, String> {
        if params.n_estimators == 0 {
            return Err("a forest needs at least one tree".into());
        }
        if rows.is_empty() {
            return Err("cannot fit a forest on an empty dataset".into());
        }

        let mut rng = SmallRng::seed_from_u64(params.seed);
        let n = rows.len();
        let trees = (0..params.n_estimators)
            .map(|_| {
                let mut tree_rng = SmallRng::seed_from_u64(rng.gen());
                let samples: Vec<usize> = if params.bootstrap {
                    (0..n).map(|_| tree_rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(rows, targets, &samples, &params.tree, &mut tree_rng)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            n_features: rows[0].len(),
        })
    }

    /// Mean prediction across all trees
    pub fn predict(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        total / self.trees.len() as f64
    }

    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Vec<f64> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// Check a deserialized forest before it is used for prediction
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("empty forest".into());
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != self.n_features {
                return Err(format!(
                    "tree {} expects {} features, forest expects {}",
                    idx,
                    tree.n_features(),
                    self.n_features
                ));
            }
            tree.validate().map_err(|e| format!("tree {}: {}", idx, e))?;
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(RegressionTree::n_nodes).sum()
    }
}
