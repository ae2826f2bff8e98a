//! Vector index error types.

use thiserror::Error;

/// Errors raised by index construction, insertion, or search.
#[derive(Debug, Error)]
pub enum IndexError {
    /// usearch index error
    #[error("Index error: {0}")]
    Index(String),

    /// Vector dimension differs from the index dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Batch insert called with differing entry and embedding counts
    #[error("Batch length mismatch: {entries} entries, {embeddings} embeddings")]
    CountMismatch { entries: usize, embeddings: usize },

    /// Entry ids must be contiguous positions in insertion order
    #[error("Non-contiguous entry id: expected {expected}, got {got}")]
    IdOutOfOrder { expected: u64, got: u64 },

    /// Search returned a key with no catalog entry
    #[error("No entry for vector id {0}")]
    NotFound(u64),
}
