//! Bulk knowledge base loading.

use std::path::Path;

use advisor_embeddings::TextEmbedder;
use advisor_index::FaqIndex;
use tracing::info;

use crate::error::DatasetError;
use crate::reader::read_faq_csv;

/// Default chunk size for bulk index inserts.
pub const DEFAULT_LOAD_BATCH_SIZE: usize = 1500;

/// Outcome of one knowledge base load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows that made it into the index
    pub rows_kept: usize,
    /// Rows dropped for a missing question or answer
    pub rows_dropped: usize,
    /// Number of insert chunks written to the index
    pub batches: usize,
}

/// Read the dataset at `path`, encode every question, and populate `index`.
///
/// Questions are encoded through a single `encode_batch` call; insertion
/// happens in chunks of `batch_size` entries so peak memory during the
/// bulk write stays bounded. The index must be empty (entry ids start
/// at 0).
pub fn load_knowledge_base<E, I>(
    embedder: &E,
    index: &I,
    path: &Path,
    batch_size: usize,
) -> Result<LoadReport, DatasetError>
where
    E: TextEmbedder,
    I: FaqIndex,
{
    let (entries, rows_dropped) = read_faq_csv(path)?;
    if entries.is_empty() {
        return Err(DatasetError::Empty);
    }

    let rows_kept = entries.len();
    info!(count = rows_kept, "Encoding dataset questions");

    let questions: Vec<String> = entries.iter().map(|e| e.question.clone()).collect();
    let embeddings = embedder.encode_batch(&questions)?;

    let batch_size = batch_size.max(1);
    let mut remaining = entries;
    let mut remaining_embeddings = &embeddings[..];
    let mut batches = 0usize;

    while !remaining.is_empty() {
        let take = remaining.len().min(batch_size);
        let rest = remaining.split_off(take);
        let (chunk_embeddings, rest_embeddings) = remaining_embeddings.split_at(take);

        index.add_batch(remaining, chunk_embeddings)?;

        remaining = rest;
        remaining_embeddings = rest_embeddings;
        batches += 1;
    }

    info!(
        entries = rows_kept,
        dropped = rows_dropped,
        batches = batches,
        "Knowledge base indexed"
    );

    Ok(LoadReport {
        rows_kept,
        rows_dropped,
        batches,
    })
}
