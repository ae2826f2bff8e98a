//! Approximate nearest-neighbor index backed by usearch.
//!
//! The usearch index holds only keys and vectors; the question/answer
//! payloads live in a parallel catalog where the vector key is the
//! catalog position. Contiguous id assignment by the loader is what makes
//! that mapping valid, so insertion enforces it.

use std::sync::RwLock;

use advisor_embeddings::Embedding;
use advisor_types::FaqEntry;
use tracing::{debug, info};
use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

use crate::error::IndexError;
use crate::index::{FaqIndex, IndexStats, ScoredFaq};

/// HNSW index configuration.
#[derive(Debug, Clone)]
pub struct HnswSettings {
    /// Embedding dimension (must match the bound embedder)
    pub dimension: usize,
    /// Graph connections per node (HNSW M)
    pub connectivity: usize,
    /// Candidate list size while building (ef_construction)
    pub expansion_add: usize,
    /// Candidate list size while searching (ef_search)
    pub expansion_search: usize,
    /// Initial capacity; the index grows past it on demand
    pub capacity: usize,
}

impl Default for HnswSettings {
    fn default() -> Self {
        Self {
            dimension: 384, // matches the default sentence-transformer
            connectivity: 16,
            expansion_add: 200,
            expansion_search: 100,
            capacity: 100_000,
        }
    }
}

impl HnswSettings {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    pub fn with_connectivity(mut self, m: usize) -> Self {
        self.connectivity = m;
        self
    }

    pub fn with_expansion(mut self, ef_add: usize, ef_search: usize) -> Self {
        self.expansion_add = ef_add;
        self.expansion_search = ef_search;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// In-memory HNSW index over usearch plus a question/answer catalog.
pub struct HnswFaqIndex {
    index: RwLock<Index>,
    catalog: RwLock<Vec<FaqEntry>>,
    settings: HnswSettings,
}

impl HnswFaqIndex {
    /// Create an empty index.
    pub fn new(settings: HnswSettings) -> Result<Self, IndexError> {
        let options = IndexOptions {
            dimensions: settings.dimension,
            metric: MetricKind::Cos,
            quantization: ScalarKind::F32,
            connectivity: settings.connectivity,
            expansion_add: settings.expansion_add,
            expansion_search: settings.expansion_search,
            multi: false, // one vector per catalog entry
        };

        info!(dim = settings.dimension, "Creating vector index");
        let index = Index::new(&options).map_err(|e| IndexError::Index(e.to_string()))?;
        index
            .reserve(settings.capacity)
            .map_err(|e| IndexError::Index(e.to_string()))?;

        Ok(Self {
            index: RwLock::new(index),
            catalog: RwLock::new(Vec::new()),
            settings,
        })
    }

    /// Create an empty index with default parameters for `dimension`.
    pub fn with_dimension(dimension: usize) -> Result<Self, IndexError> {
        Self::new(HnswSettings::new(dimension))
    }
}

impl FaqIndex for HnswFaqIndex {
    fn dimension(&self) -> usize {
        self.settings.dimension
    }

    fn len(&self) -> usize {
        self.catalog.read().unwrap().len()
    }

    #[allow(clippy::readonly_write_lock)] // usearch::Index uses interior mutability
    fn add_batch(
        &self,
        entries: Vec<FaqEntry>,
        embeddings: &[Embedding],
    ) -> Result<(), IndexError> {
        if entries.len() != embeddings.len() {
            return Err(IndexError::CountMismatch {
                entries: entries.len(),
                embeddings: embeddings.len(),
            });
        }

        let index = self.index.write().unwrap();
        let mut catalog = self.catalog.write().unwrap();

        // Validate the whole batch before touching the index so a bad
        // record cannot leave the catalog and the vectors out of step.
        let mut next_id = catalog.len() as u64;
        for (entry, embedding) in entries.iter().zip(embeddings.iter()) {
            if embedding.dimension() != self.settings.dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: self.settings.dimension,
                    actual: embedding.dimension(),
                });
            }
            if entry.id != next_id {
                return Err(IndexError::IdOutOfOrder {
                    expected: next_id,
                    got: entry.id,
                });
            }
            next_id += 1;
        }

        let needed = catalog.len() + entries.len();
        if needed > index.capacity() {
            index
                .reserve(needed)
                .map_err(|e| IndexError::Index(e.to_string()))?;
        }

        for (entry, embedding) in entries.into_iter().zip(embeddings.iter()) {
            index
                .add(entry.id, embedding.as_slice())
                .map_err(|e| IndexError::Index(e.to_string()))?;
            catalog.push(entry);
        }

        debug!(total = catalog.len(), "Batch inserted");
        Ok(())
    }

    fn search(&self, query: &Embedding, k: usize) -> Result<Vec<ScoredFaq>, IndexError> {
        if query.dimension() != self.settings.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.settings.dimension,
                actual: query.dimension(),
            });
        }

        let index = self.index.read().unwrap();
        let catalog = self.catalog.read().unwrap();

        let results = index
            .search(query.as_slice(), k)
            .map_err(|e| IndexError::Index(e.to_string()))?;

        let mut hits = Vec::with_capacity(results.keys.len());
        for (&id, &dist) in results.keys.iter().zip(results.distances.iter()) {
            let entry = catalog
                .get(id as usize)
                .ok_or(IndexError::NotFound(id))?
                .clone();
            // usearch reports cosine distance; convert to similarity
            hits.push(ScoredFaq::new(entry, 1.0 - dist));
        }

        debug!(k = k, found = hits.len(), "Search complete");
        Ok(hits)
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            entry_count: self.len(),
            dimension: self.settings.dimension,
        }
    }
}
