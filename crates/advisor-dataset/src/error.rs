//! Dataset error types.

use thiserror::Error;

/// Errors raised while reading or indexing the knowledge base.
///
/// All of these abort engine construction.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset file does not exist
    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// IO error while reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// Every row was dropped as incomplete (or the file had no rows)
    #[error("Dataset contains no usable rows")]
    Empty,

    /// Question encoding failed during load
    #[error("Embedding error: {0}")]
    Embedding(#[from] advisor_embeddings::EmbeddingError),

    /// Bulk insert into the vector index failed
    #[error("Index error: {0}")]
    Index(#[from] advisor_index::IndexError),
}
