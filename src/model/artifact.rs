use serde::{Deserialize, Serialize};

use super::{sigmoid, ChampionModel, FeatureImportance, FeatureMatrix};
use crate::error::{PipelineError, Result};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serialized champion classifier.
///
/// Example JSON:
/// ```json
/// {
///   "format_version": 1,
///   "name": "f1-champion-xgb",
///   "features": ["points", "wins", "podiums"],
///   "estimator": {
///     "kind": "tree_ensemble",
///     "base_margin": -2.0,
///     "trees": [
///       { "nodes": [
///         { "split": 0, "split_condition": 350.0, "yes": 1, "no": 2 },
///         { "leaf": -1.5 },
///         { "leaf": 2.5 }
///       ] }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    pub features: Vec<String>,
    /// Explicit importances exported by the trainer, one per feature
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// P = sigmoid(intercept + sum(coefficients[i] * x[i]))
    Logistic {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// P = sigmoid(base_margin + sum of one leaf per tree)
    TreeEnsemble { base_margin: f64, trees: Vec<Tree> },
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Tree node. Splits send a row to `yes` when `x[split] < split_condition`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        split: usize,
        split_condition: f64,
        yes: usize,
        no: usize,
    },
    Leaf {
        leaf: f64,
    },
}

impl Tree {
    /// Walk from the root to a leaf. Returns None for a malformed tree.
    fn leaf_value(&self, row: &[f64]) -> Option<f64> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx)? {
                TreeNode::Leaf { leaf } => return Some(*leaf),
                TreeNode::Split {
                    split,
                    split_condition,
                    yes,
                    no,
                } => {
                    idx = if *row.get(*split)? < *split_condition {
                        *yes
                    } else {
                        *no
                    };
                }
            }
        }
        None
    }
}

impl ModelArtifact {
    /// Structural checks that serde cannot express.
    /// Returns all problems at once.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.format_version != ARTIFACT_FORMAT_VERSION {
            errors.push(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            ));
        }

        let n_features = self.features.len();
        if n_features == 0 {
            errors.push("features: must not be empty".to_string());
        }

        if let Some(importances) = &self.feature_importances {
            if importances.len() != n_features {
                errors.push(format!(
                    "feature_importances: has {} values for {} features",
                    importances.len(),
                    n_features
                ));
            }
        }

        match &self.estimator {
            Estimator::Logistic {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != n_features {
                    errors.push(format!(
                        "estimator.coefficients: has {} values for {} features",
                        coefficients.len(),
                        n_features
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    errors.push("estimator: coefficients must be finite".to_string());
                }
            }
            Estimator::TreeEnsemble { base_margin, trees } => {
                if !base_margin.is_finite() {
                    errors.push("estimator.base_margin: must be finite".to_string());
                }
                for (t, tree) in trees.iter().enumerate() {
                    validate_tree(t, tree, n_features, &mut errors);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn margin(&self, row: &[f64]) -> Option<f64> {
        match &self.estimator {
            Estimator::Logistic {
                intercept,
                coefficients,
            } => Some(
                intercept
                    + coefficients
                        .iter()
                        .zip(row)
                        .map(|(c, x)| c * x)
                        .sum::<f64>(),
            ),
            Estimator::TreeEnsemble { base_margin, trees } => trees
                .iter()
                .map(|t| t.leaf_value(row))
                .sum::<Option<f64>>()
                .map(|sum| base_margin + sum),
        }
    }

    /// Raw importances before normalization.
    fn raw_importances(&self) -> Vec<f64> {
        if let Some(explicit) = &self.feature_importances {
            return explicit.clone();
        }
        match &self.estimator {
            Estimator::Logistic { coefficients, .. } => {
                coefficients.iter().map(|c| c.abs()).collect()
            }
            Estimator::TreeEnsemble { trees, .. } => {
                // Split frequency per feature
                let mut counts = vec![0.0; self.features.len()];
                for node in trees.iter().flat_map(|t| &t.nodes) {
                    if let TreeNode::Split { split, .. } = node {
                        if let Some(count) = counts.get_mut(*split) {
                            *count += 1.0;
                        }
                    }
                }
                counts
            }
        }
    }
}

// Child indices must point strictly forward so traversal always ends at a leaf.
fn validate_tree(t: usize, tree: &Tree, n_features: usize, errors: &mut Vec<String>) {
    if tree.nodes.is_empty() {
        errors.push(format!("estimator.trees[{}]: has no nodes", t));
        return;
    }
    for (i, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                split,
                split_condition,
                yes,
                no,
            } => {
                if *split >= n_features {
                    errors.push(format!(
                        "estimator.trees[{}].nodes[{}]: split feature {} out of range",
                        t, i, split
                    ));
                }
                if !split_condition.is_finite() {
                    errors.push(format!(
                        "estimator.trees[{}].nodes[{}]: split_condition must be finite",
                        t, i
                    ));
                }
                for child in [yes, no] {
                    if *child <= i || *child >= tree.nodes.len() {
                        errors.push(format!(
                            "estimator.trees[{}].nodes[{}]: invalid child index {}",
                            t, i, child
                        ));
                    }
                }
            }
            TreeNode::Leaf { leaf } => {
                if !leaf.is_finite() {
                    errors.push(format!(
                        "estimator.trees[{}].nodes[{}]: leaf must be finite",
                        t, i
                    ));
                }
            }
        }
    }
}

impl ChampionModel for ModelArtifact {
    fn name(&self) -> &str {
        &self.name
    }

    fn features(&self) -> &[String] {
        &self.features
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>> {
        features.check_shape(&self.features)?;
        features
            .rows
            .iter()
            .map(|row| {
                let margin = self.margin(row).ok_or_else(|| {
                    PipelineError::Inference("malformed tree in model".to_string())
                })?;
                let p = sigmoid(margin);
                if p.is_finite() {
                    Ok([1.0 - p, p])
                } else {
                    Err(PipelineError::Inference(
                        "model produced a non-finite probability".to_string(),
                    ))
                }
            })
            .collect()
    }

    fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
        let raw = self.raw_importances();
        let total: f64 = raw.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        Some(
            self.features
                .iter()
                .zip(raw)
                .map(|(feature, value)| FeatureImportance {
                    feature: feature.clone(),
                    importance: value / total,
                })
                .collect(),
        )
    }
}
