//! Champion classifier abstraction, on-disk artifact format, and loading.

pub mod artifact;
pub mod cache;
pub mod loader;

pub use artifact::{Estimator, ModelArtifact, TreeNode, ARTIFACT_FORMAT_VERSION};
pub use cache::ModelCache;
pub use loader::load_model;

use crate::error::{PipelineError, Result};

/// Feature columns in the order the classifier was trained on.
pub const FEATURE_COLUMNS: [&str; 3] = ["points", "wins", "podiums"];

/// Named numeric input for a classifier, one row per record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(columns: &[&str], rows: Vec<Vec<f64>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check that columns match `expected` exactly (names and order) and that
    /// every row is the right width with finite values.
    pub fn check_shape(&self, expected: &[String]) -> Result<()> {
        if self.columns != expected {
            return Err(PipelineError::Inference(format!(
                "feature mismatch: model expects [{}], got [{}]",
                expected.join(", "),
                self.columns.join(", ")
            )));
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != expected.len() {
                return Err(PipelineError::Inference(format!(
                    "row {} has {} values, expected {}",
                    i + 1,
                    row.len(),
                    expected.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(PipelineError::Inference(format!(
                    "row {} contains a non-finite value",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

/// How much the model relies on one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// A trained binary classifier for "is this a champion season".
///
/// Implementations are read-only after construction, so one instance can be
/// shared between any number of callers.
pub trait ChampionModel: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &str;

    /// Feature names in the order the model expects them.
    fn features(&self) -> &[String];

    /// Two-class probabilities per row: `[P(not champion), P(champion)]`.
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>>;

    /// Per-feature importances, if the model can report them.
    fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
        None
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
