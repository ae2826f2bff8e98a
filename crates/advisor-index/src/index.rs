//! Index trait and search result types.

use advisor_embeddings::Embedding;
use advisor_types::FaqEntry;

use crate::error::IndexError;

/// One search hit: the stored entry plus its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredFaq {
    /// The indexed question/answer pair
    pub entry: FaqEntry,
    /// Cosine similarity to the query (higher = more similar)
    pub score: f32,
}

impl ScoredFaq {
    pub fn new(entry: FaqEntry, score: f32) -> Self {
        Self { entry, score }
    }
}

/// Index statistics.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Number of indexed entries
    pub entry_count: usize,
    /// Embedding dimension
    pub dimension: usize,
}

/// Trait for knowledge base indexes.
///
/// Insertion happens only during the one-time load phase; afterwards the
/// index is queried concurrently, so implementations take `&self` and
/// synchronize internally.
pub trait FaqIndex: Send + Sync {
    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Get the number of indexed entries.
    fn len(&self) -> usize;

    /// Check if the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a batch of entries with their embeddings (parallel slices,
    /// same order). Entry ids must continue the contiguous sequence of
    /// already-inserted ids.
    fn add_batch(&self, entries: Vec<FaqEntry>, embeddings: &[Embedding])
        -> Result<(), IndexError>;

    /// Search for the `k` entries nearest to `query`, best first.
    /// Returns fewer than `k` results when the index is small.
    fn search(&self, query: &Embedding, k: usize) -> Result<Vec<ScoredFaq>, IndexError>;

    /// Get index statistics.
    fn stats(&self) -> IndexStats;
}
