//! Model file caching.
//!
//! Downloads model files from HuggingFace Hub on first use and reuses the
//! local copies afterwards, so the embedder works offline once warmed.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::EmbeddingError;

/// Default sentence-embedding model repository on HuggingFace.
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Files required to run the model locally.
pub const MODEL_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];

/// Local cache location for one model repository.
#[derive(Debug, Clone)]
pub struct ModelCache {
    /// Root cache directory
    pub cache_dir: PathBuf,
    /// HuggingFace repository ID
    pub repo_id: String,
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::for_repo(DEFAULT_MODEL_REPO)
    }
}

impl ModelCache {
    /// Cache under the user cache dir (`~/.cache/fin-advisor/models`) for
    /// the given repository.
    pub fn for_repo(repo_id: impl Into<String>) -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("fin-advisor")
            .join("models");

        Self {
            cache_dir,
            repo_id: repo_id.into(),
        }
    }

    /// Cache with an explicit root directory.
    pub fn new(cache_dir: impl Into<PathBuf>, repo_id: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            repo_id: repo_id.into(),
        }
    }

    /// Short model name (repository tail), e.g. "all-MiniLM-L6-v2".
    pub fn model_name(&self) -> &str {
        self.repo_id.rsplit('/').next().unwrap_or(&self.repo_id)
    }

    /// Directory holding this model's files.
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(self.repo_id.replace('/', "_"))
    }

    /// True when every required file is present locally.
    pub fn is_cached(&self) -> bool {
        let paths = ModelPaths::in_dir(&self.model_dir());
        paths.config.exists() && paths.tokenizer.exists() && paths.weights.exists()
    }

    /// Path to one model file inside the cache.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.model_dir().join(filename)
    }
}

/// Paths to the three files the embedder loads.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelPaths {
    fn in_dir(dir: &Path) -> Self {
        Self {
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights: dir.join("model.safetensors"),
        }
    }
}

/// Resolve model files, downloading them on a cold cache.
pub fn get_or_download_model(cache: &ModelCache) -> Result<ModelPaths, EmbeddingError> {
    if cache.is_cached() {
        debug!(model = cache.model_name(), "Model already cached");
    } else {
        fetch_from_hub(cache)?;
    }

    Ok(ModelPaths::in_dir(&cache.model_dir()))
}

fn fetch_from_hub(cache: &ModelCache) -> Result<(), EmbeddingError> {
    use hf_hub::api::sync::Api;

    info!(repo = %cache.repo_id, "Fetching model files from HuggingFace Hub");

    let repo = Api::new()
        .map_err(|e| EmbeddingError::Download(e.to_string()))?
        .model(cache.repo_id.clone());

    let model_dir = cache.model_dir();
    std::fs::create_dir_all(&model_dir)?;

    for filename in MODEL_FILES {
        info!(file = filename, "Fetching");
        let fetched = repo
            .get(filename)
            .map_err(|e| EmbeddingError::Download(format!("{}: {}", filename, e)))?;
        std::fs::copy(&fetched, model_dir.join(filename))?;
        debug!(file = filename, "Stored in cache");
    }

    Ok(())
}
