use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::{ChampionModel, ModelArtifact};
use crate::error::{PipelineError, Result};

/// Load a model artifact from a JSON file.
///
/// The file handle is dropped before returning on every path, including a
/// parse failure. Nothing is returned unless the artifact passes validation.
///
/// # Errors
///
/// - `ModelNotFound` if nothing exists at `path`
/// - `ModelLoad` if the file cannot be read, is not valid JSON, or fails
///   structural validation
pub fn load_model(path: &Path) -> Result<Arc<dyn ChampionModel>> {
    if !path.exists() {
        return Err(PipelineError::ModelNotFound {
            path: path.to_path_buf(),
        });
    }

    info!(path = %path.display(), "Loading model");

    let artifact: ModelArtifact = {
        let file = File::open(path).map_err(|e| load_error(path, e.to_string()))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| load_error(path, format!("invalid model JSON: {}", e)))?
    };

    artifact
        .validate()
        .map_err(|errors| load_error(path, errors.join("; ")))?;

    info!(
        model = %artifact.name,
        features = ?artifact.features,
        "Model loaded successfully"
    );

    Ok(Arc::new(artifact))
}

fn load_error(path: &Path, reason: String) -> PipelineError {
    PipelineError::ModelLoad {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureMatrix, FEATURE_COLUMNS};
    use std::env;
    use std::fs;

    const LOGISTIC_JSON: &str = r#"{
        "format_version": 1,
        "name": "f1-logit",
        "features": ["points", "wins", "podiums"],
        "estimator": { "kind": "logistic", "intercept": -10.0, "coefficients": [0.02, 0.3, 0.1] }
    }"#;

    #[test]
    fn test_missing_file_is_model_not_found() {
        let path = env::temp_dir().join("f1_predictor_test_no_such_model.json");
        let _ = fs::remove_file(&path);

        match load_model(&path) {
            Err(PipelineError::ModelNotFound { path: p }) => assert_eq!(p, path),
            Err(e) => panic!("expected ModelNotFound, got {}", e),
            Ok(_) => panic!("expected ModelNotFound, got a model"),
        }
    }

    #[test]
    fn test_load_valid_model() {
        let path = env::temp_dir().join("f1_predictor_test_valid_model.json");
        fs::write(&path, LOGISTIC_JSON).unwrap();

        let model = load_model(&path).unwrap();
        assert_eq!(model.name(), "f1-logit");
        let probs = model
            .predict_proba(&FeatureMatrix::new(&FEATURE_COLUMNS, vec![vec![400.0, 10.0, 15.0]]))
            .unwrap();
        assert!(probs[0][1] > 0.9);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_model_load_error() {
        let path = env::temp_dir().join("f1_predictor_test_corrupt_model.json");
        fs::write(&path, "\u{80}not json at all").unwrap();

        let err = load_model(&path).err().unwrap();
        assert!(matches!(err, PipelineError::ModelLoad { .. }));
        assert!(err.to_string().contains("invalid model JSON"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_mismatch_is_model_load_error() {
        let path = env::temp_dir().join("f1_predictor_test_future_model.json");
        fs::write(&path, LOGISTIC_JSON.replace("\"format_version\": 1", "\"format_version\": 2"))
            .unwrap();

        let err = load_model(&path).err().unwrap();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("unsupported format_version 2"));

        let _ = fs::remove_file(&path);
    }
}
