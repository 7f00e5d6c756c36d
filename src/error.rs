//! Error types for the domus pipeline

use thiserror::Error;

/// Result type alias for domus operations
pub type Result<T> = std::result::Result<T, DomusError>;

/// Main error type for the training pipeline and the packaged artifact
#[derive(Error, Debug)]
pub enum DomusError {
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("stratification error: {0}")]
    Stratification(String),

    #[error("column {0} has no observed values")]
    EmptyColumn(usize),

    #[error("transform or model used before fit")]
    NotFitted,

    #[error("model selection error: {0}")]
    Selection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for DomusError {
    fn from(err: polars::error::PolarsError) -> Self {
        DomusError::DataUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DomusError {
    fn from(err: serde_json::Error) -> Self {
        DomusError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DomusError {
    fn from(err: ndarray::ShapeError) -> Self {
        DomusError::Shape {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomusError::DataUnavailable("missing file".to_string());
        assert_eq!(err.to_string(), "data unavailable: missing file");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DomusError = io_err.into();
        assert!(matches!(err, DomusError::Io(_)));
    }

    #[test]
    fn test_empty_column_display() {
        let err = DomusError::EmptyColumn(4);
        assert!(err.to_string().contains("column 4"));
    }
}
