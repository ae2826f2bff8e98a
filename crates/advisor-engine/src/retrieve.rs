//! Semantic context retrieval.

use std::sync::Arc;

use tracing::debug;

use advisor_embeddings::TextEmbedder;
use advisor_index::FaqIndex;

use crate::error::EngineError;

/// Retrieves the nearest knowledge-base entries for a query and formats
/// them as a numbered context block.
///
/// The embedder handed in here must be the instance that encoded the
/// index's entries; mixing models makes the similarity scores
/// meaningless.
pub struct ContextRetriever<E, I> {
    embedder: Arc<E>,
    index: Arc<I>,
}

impl<E, I> ContextRetriever<E, I>
where
    E: TextEmbedder + 'static,
    I: FaqIndex,
{
    /// Bind an embedder to a loaded index.
    pub fn new(embedder: Arc<E>, index: Arc<I>) -> Self {
        Self { embedder, index }
    }

    /// Retrieve up to `top_k` entries and render them nearest-first as
    /// `"{n}. Q: {question}\nA: {answer}"` blocks.
    ///
    /// A smaller knowledge base yields fewer blocks; that is not an
    /// error. Query encoding runs on the blocking pool since it is
    /// CPU-bound.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<String, EngineError> {
        let embedder = self.embedder.clone();
        let query_owned = query.to_string();
        let embedding = tokio::task::spawn_blocking(move || embedder.encode(&query_owned))
            .await
            .map_err(|e| EngineError::Task(e.to_string()))??;

        let matches = self.index.search(&embedding, top_k)?;
        debug!(
            requested = top_k,
            returned = matches.len(),
            "Retrieved context entries"
        );

        let mut context = String::new();
        for (i, scored) in matches.iter().enumerate() {
            context.push_str(&format!(
                "{}. Q: {}\nA: {}\n\n",
                i + 1,
                scored.entry.question,
                scored.entry.answer
            ));
        }

        Ok(context)
    }
}
