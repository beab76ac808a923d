//! CART regression tree
//!
//! Array-based layout: node 0 is the root, internal nodes point at their
//! children by index and children are always stored after their parent.
//! Splits minimise the summed squared error of the two halves; leaves
//! predict the mean target of the samples that reached them.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Feature index marking a leaf node
pub const LEAF: i32 = -2;
/// Child index stored on leaf nodes
pub const NO_CHILD: i32 = -1;

/// A node in a regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeNode {
    /// Feature index to split on ([`LEAF`] for leaf nodes)
    pub feature: i32,
    /// Samples with `value <= threshold` go left
    pub threshold: f64,
    pub left_child: i32,
    pub right_child: i32,
    /// Mean target of the training samples at this node
    pub value: f64,
}

impl TreeNode {
    fn leaf(value: f64) -> Self {
        Self {
            feature: LEAF,
            threshold: f64::from(LEAF),
            left_child: NO_CHILD,
            right_child: NO_CHILD,
            value,
        }
    }

    pub const fn is_leaf(&self) -> bool {
        self.feature < 0
    }
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
    /// Features considered per split; `None` considers all
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    score: f64,
}

struct Frame {
    node: usize,
    samples: Vec<usize>,
    depth: usize,
}

/// A fitted regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `samples`.
    ///
    /// `samples` may repeat indices (bootstrap draws); repeated rows are
    /// weighted by their multiplicity.
    ///
    /// # Errors
    ///
    /// Returns `Err` on empty input, ragged rows, or out-of-range indices.
    pub fn fit<R: Rng + ?Sized>(
        rows: &[Vec<f64>],
        targets: &[f64],
        samples: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self, String> {
        if rows.is_empty() || samples.is_empty() {
            return Err("cannot fit a tree on an empty dataset".into());
        }
        if rows.len() != targets.len() {
            return Err(format!(
                "{} feature rows but {} targets",
                rows.len(),
                targets.len()
            ));
        }
        let n_features = rows[0].len();
        if n_features == 0 || rows.iter().any(|row| row.len() != n_features) {
            return Err("feature rows must share a non-zero width".into());
        }
        if samples.iter().any(|&i| i >= rows.len()) {
            return Err("sample index out of range".into());
        }

        let mut nodes = vec![TreeNode::leaf(0.0)];
        let mut stack = vec![Frame {
            node: 0,
            samples: samples.to_vec(),
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            let value = mean_target(targets, &frame.samples);
            let split = if can_split(&frame, targets, params) {
                best_split(rows, targets, &frame.samples, n_features, params, rng)
            } else {
                None
            };

            let Some(split) = split else {
                nodes[frame.node] = TreeNode::leaf(value);
                continue;
            };

            let (left, right): (Vec<usize>, Vec<usize>) = frame
                .samples
                .iter()
                .partition(|&&i| rows[i][split.feature] <= split.threshold);

            let left_idx = nodes.len();
            let right_idx = left_idx + 1;
            nodes.push(TreeNode::leaf(0.0));
            nodes.push(TreeNode::leaf(0.0));
            nodes[frame.node] = TreeNode {
                feature: split.feature as i32,
                threshold: split.threshold,
                left_child: left_idx as i32,
                right_child: right_idx as i32,
                value,
            };

            stack.push(Frame {
                node: right_idx,
                samples: right,
                depth: frame.depth + 1,
            });
            stack.push(Frame {
                node: left_idx,
                samples: left,
                depth: frame.depth + 1,
            });
        }

        Ok(Self { nodes, n_features })
    }

    /// Predict a single sample by walking from the root to a leaf.
    #[allow(clippy::cast_sign_loss)]
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return node.value;
            }
            let feat_val = features.get(node.feature as usize).copied().unwrap_or(0.0);
            idx = if feat_val <= node.threshold {
                node.left_child as usize
            } else {
                node.right_child as usize
            };
        }
    }

    /// Check the node layout of a deserialized tree.
    ///
    /// Every internal node must split on a known feature and point forward
    /// to children inside the node array, which guarantees `predict`
    /// terminates without indexing out of bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let len = self.nodes.len() as i64;
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if !node.value.is_finite() {
                    return Err(format!("leaf {} holds a non-finite value", idx));
                }
                continue;
            }
            if node.feature as usize >= self.n_features {
                return Err(format!("node {} splits on unknown feature {}", idx, node.feature));
            }
            let idx = idx as i64;
            for child in [node.left_child, node.right_child] {
                let child = i64::from(child);
                if child <= idx || child >= len {
                    return Err(format!("node {} has invalid child {}", idx, child));
                }
            }
        }
        Ok(())
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// Longest root-to-leaf path
    #[allow(clippy::cast_sign_loss)]
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut deepest = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            deepest = deepest.max(depths[idx]);
            if !node.is_leaf() {
                depths[node.left_child as usize] = depths[idx] + 1;
                depths[node.right_child as usize] = depths[idx] + 1;
            }
        }
        deepest
    }
}

fn mean_target(targets: &[f64], samples: &[usize]) -> f64 {
    let sum: f64 = samples.iter().map(|&i| targets[i]).sum();
    sum / samples.len() as f64
}

fn can_split(frame: &Frame, targets: &[f64], params: &TreeParams) -> bool {
    if frame.samples.len() < params.min_samples_split.max(2) {
        return false;
    }
    if params.max_depth.is_some_and(|max| frame.depth >= max) {
        return false;
    }
    let first = targets[frame.samples[0]];
    frame.samples.iter().any(|&i| targets[i] != first)
}

fn best_split<R: Rng + ?Sized>(
    rows: &[Vec<f64>],
    targets: &[f64],
    samples: &[usize],
    n_features: usize,
    params: &TreeParams,
    rng: &mut R,
) -> Option<Split> {
    let candidates: Vec<usize> = match params.max_features {
        Some(k) if k > 0 && k < n_features => {
            rand::seq::index::sample(rng, n_features, k).into_vec()
        }
        _ => (0..n_features).collect(),
    };

    let n = samples.len() as f64;
    let total: f64 = samples.iter().map(|&i| targets[i]).sum();
    // Maximising sum_l^2/n_l + sum_r^2/n_r minimises the children's SSE
    let parent_score = total * total / n;

    let mut best: Option<Split> = None;
    let mut order = samples.to_vec();
    for feature in candidates {
        order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let mut left_sum = 0.0;
        for k in 0..order.len() - 1 {
            left_sum += targets[order[k]];
            let here = rows[order[k]][feature];
            let next = rows[order[k + 1]][feature];
            if here >= next {
                continue;
            }

            let left_n = (k + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total - left_sum;
            let score = left_sum * left_sum / left_n + right_sum * right_sum / right_n;

            if best.map_or(true, |b| score > b.score) {
                let mut threshold = here + (next - here) / 2.0;
                if threshold >= next {
                    threshold = here;
                }
                best = Some(Split {
                    feature,
                    threshold,
                    score,
                });
            }
        }
    }

    best.filter(|split| split.score > parent_score)
}
