//! Engine construction from settings.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use advisor_backend::{GeminiClient, GeminiConfig, GenerativeBackend};
use advisor_dataset::{load_knowledge_base, DatasetError};
use advisor_embeddings::{CandleEmbedder, ModelCache, TextEmbedder};
use advisor_index::HnswFaqIndex;
use advisor_types::Settings;

use crate::engine::ResponseEngine;
use crate::error::EngineError;

/// The fully wired production engine.
pub type FinanceEngine = ResponseEngine<CandleEmbedder, HnswFaqIndex, GeminiClient>;

/// Build a ready-to-serve engine from settings.
///
/// Fails fast on a missing credential or dataset before any model
/// weights are loaded. Returns only once the knowledge base is fully
/// indexed; the backend connectivity probe runs last and is advisory
/// (a warning, never fatal).
pub async fn bootstrap(settings: &Settings) -> Result<FinanceEngine, EngineError> {
    let api_key = settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            EngineError::Configuration(
                "api_key is not set; export ADVISOR_API_KEY or add api_key to the config file"
                    .to_string(),
            )
        })?;

    let dataset_path = settings.expanded_dataset_path();
    if !dataset_path.exists() {
        return Err(EngineError::Dataset(DatasetError::NotFound(
            dataset_path.display().to_string(),
        )));
    }

    let backend = GeminiClient::new(GeminiConfig::new(api_key, settings.model.clone()))
        .map_err(|e| EngineError::Configuration(e.to_string()))?;

    // Model load is CPU- and disk-bound; keep it off the async executor.
    let repo = settings.embedding_model.clone();
    let embedder = tokio::task::spawn_blocking(move || {
        let cache = ModelCache::for_repo(repo);
        CandleEmbedder::load(&cache)
    })
    .await
    .map_err(|e| EngineError::Task(e.to_string()))??;

    let info = embedder.info();
    info!(model = %info.name, dimension = info.dimension, "Embedding model loaded");

    let index = HnswFaqIndex::with_dimension(info.dimension)?;

    let embedder = Arc::new(embedder);
    let index = Arc::new(index);

    let loader_embedder = Arc::clone(&embedder);
    let loader_index = Arc::clone(&index);
    let batch_size = settings.load_batch_size;
    let report = tokio::task::spawn_blocking(move || {
        load_knowledge_base(
            loader_embedder.as_ref(),
            loader_index.as_ref(),
            &dataset_path,
            batch_size,
        )
    })
    .await
    .map_err(|e| EngineError::Task(e.to_string()))??;

    info!(
        entries = report.rows_kept,
        dropped = report.rows_dropped,
        batches = report.batches,
        "Knowledge base indexed"
    );

    match backend.probe().await {
        Ok(()) => info!(model = %settings.model, "Backend connection verified"),
        Err(e) => warn!(error = %e, "Backend connectivity check failed"),
    }

    let engine = ResponseEngine::new(embedder, index, Arc::new(backend))
        .with_top_k(settings.top_k)
        .with_cache_ttl(Duration::from_secs(settings.cache_ttl_secs));

    Ok(engine)
}
