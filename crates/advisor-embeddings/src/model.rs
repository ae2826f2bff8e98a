//! Embedder trait and vector types.

use crate::error::EmbeddingError;

/// A unit-length embedding vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// Vector components, normalized to unit length at construction.
    pub values: Vec<f32>,
}

impl Embedding {
    /// Create an embedding from raw components, normalizing to unit length.
    /// An all-zero vector is kept as-is rather than dividing by zero.
    pub fn new(values: Vec<f32>) -> Self {
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        let values = if norm > 0.0 {
            values.into_iter().map(|v| v / norm).collect()
        } else {
            values
        };
        Self { values }
    }

    /// Wrap components that are already unit length.
    pub fn from_normalized(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Raw component view, as consumed by the vector index.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Cosine similarity in `[-1, 1]` (1 = identical direction).
    /// Both operands are unit length, so this is a plain dot product.
    /// Mismatched dimensions yield 0.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.dimension() != other.dimension() {
            return 0.0;
        }
        self.values.iter().zip(&other.values).map(|(a, b)| a * b).sum()
    }
}

/// Information about a loaded embedding model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub name: String,
    /// Output vector dimension
    pub dimension: usize,
    /// Maximum input length in tokens; longer inputs are truncated
    pub max_sequence_length: usize,
}

/// Text-to-vector encoder.
///
/// One embedder instance is bound to one vector index for the index's whole
/// lifetime; encoding queries with a different model than the stored entries
/// would make the similarity scores meaningless. Implementations must be
/// `Send + Sync` for concurrent use.
pub trait TextEmbedder: Send + Sync {
    /// Get model information.
    fn info(&self) -> &ModelInfo;

    /// Encode a single text.
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Encode a batch of texts, preserving input order.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;
}
