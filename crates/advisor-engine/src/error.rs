//! Engine error types.

use thiserror::Error;

/// Errors raised while constructing or running the response engine.
///
/// Per-request backend failures never appear here; the engine absorbs
/// them into the reply text so `answer` stays total.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Required configuration is missing or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Knowledge base could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(#[from] advisor_dataset::DatasetError),

    /// Embedding model failure
    #[error("Embedding error: {0}")]
    Embedding(#[from] advisor_embeddings::EmbeddingError),

    /// Vector index failure
    #[error("Index error: {0}")]
    Index(#[from] advisor_index::IndexError),

    /// A background task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = EngineError::Configuration("api_key is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: api_key is not set");
    }

    #[test]
    fn test_dataset_error_conversion() {
        let err: EngineError = advisor_dataset::DatasetError::Empty.into();
        assert!(matches!(err, EngineError::Dataset(_)));
    }
}
