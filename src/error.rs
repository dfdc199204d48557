use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the scoring pipeline.
///
/// Model errors are fatal for any command that needs predictions. Everything
/// else is tied to a single request and the caller can re-prompt.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("model file not found at {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("missing required columns: {}", missing.join(", "))]
    SchemaValidation { missing: Vec<String> },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("driver not found: {}", drivers.join(", "))]
    NotFound { drivers: Vec<String> },

    #[error("table has no rows")]
    EmptyTable,

    #[error("upload exceeds the {limit}-row limit")]
    TooManyRows { limit: usize },

    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// True for errors that must halt every prediction-dependent operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::ModelNotFound { .. } | PipelineError::ModelLoad { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_errors_are_fatal() {
        let not_found = PipelineError::ModelNotFound {
            path: PathBuf::from("/tmp/missing.json"),
        };
        let load = PipelineError::ModelLoad {
            path: PathBuf::from("/tmp/bad.json"),
            reason: "bad json".to_string(),
        };
        assert!(not_found.is_fatal());
        assert!(load.is_fatal());
        assert!(!PipelineError::EmptyTable.is_fatal());
        assert!(!PipelineError::Inference("shape".to_string()).is_fatal());
    }

    #[test]
    fn test_messages_name_offending_items() {
        let err = PipelineError::SchemaValidation {
            missing: vec!["wins".to_string(), "podiums".to_string()],
        };
        assert_eq!(err.to_string(), "missing required columns: wins, podiums");

        let err = PipelineError::ModelNotFound {
            path: PathBuf::from("/models/f1.json"),
        };
        assert!(err.to_string().contains("/models/f1.json"));

        let err = PipelineError::NotFound {
            drivers: vec!["Alice".to_string()],
        };
        assert_eq!(err.to_string(), "driver not found: Alice");
    }
}
