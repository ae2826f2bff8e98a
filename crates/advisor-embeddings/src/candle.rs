//! Candle-based embedder.
//!
//! Runs all-MiniLM-L6-v2 on CPU: wordpiece tokenization, BERT forward
//! pass, mean pooling over the attention mask, unit-length normalization.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::cache::{get_or_download_model, ModelCache};
use crate::error::EmbeddingError;
use crate::model::{Embedding, ModelInfo, TextEmbedder};

/// Embedding dimension of all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Maximum sequence length in tokens; longer inputs are truncated.
pub const MAX_SEQ_LENGTH: usize = 256;

/// Inputs per forward pass. Batches larger than this are encoded in
/// chunks so one oversized padded tensor never has to fit in memory.
const ENCODE_CHUNK: usize = 32;

/// CPU embedder over a BERT sentence-transformer model.
pub struct CandleEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    info: ModelInfo,
}

impl CandleEmbedder {
    /// Load the model from the given cache, downloading on a cold start.
    pub fn load(cache: &ModelCache) -> Result<Self, EmbeddingError> {
        let paths = get_or_download_model(cache)?;
        Self::load_from_paths(cache.model_name(), &paths.config, &paths.tokenizer, &paths.weights)
    }

    /// Load the default model from the default cache location.
    pub fn load_default() -> Result<Self, EmbeddingError> {
        Self::load(&ModelCache::default())
    }

    /// Load from explicit file paths.
    pub fn load_from_paths(
        model_name: &str,
        config_path: &std::path::Path,
        tokenizer_path: &std::path::Path,
        weights_path: &std::path::Path,
    ) -> Result<Self, EmbeddingError> {
        info!(model = model_name, "Loading embedding model...");

        // CPU only; the model is small enough that query latency stays low
        let device = Device::Cpu;

        let raw_config = std::fs::read_to_string(config_path)?;
        let config: BertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| EmbeddingError::ModelNotFound(format!("Bad model config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let weights = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.to_path_buf()], DType::F32, &device)?
        };
        let model = BertModel::load(weights, &config)?;

        info!(
            dim = EMBEDDING_DIM,
            max_seq = MAX_SEQ_LENGTH,
            "Embedding model ready"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            info: ModelInfo {
                name: model_name.to_string(),
                dimension: EMBEDDING_DIM,
                max_sequence_length: MAX_SEQ_LENGTH,
            },
        })
    }

    /// Encode one chunk of texts through a single forward pass.
    fn encode_chunk(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let encoded = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        // Pad every sequence in the chunk to the longest one, capped at
        // the model's maximum length.
        let longest = encoded.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let seq_len = longest.min(MAX_SEQ_LENGTH);

        let rows = encoded.len();
        let mut ids = Vec::with_capacity(rows * seq_len);
        let mut mask = Vec::with_capacity(rows * seq_len);
        for enc in &encoded {
            let keep = enc.get_ids().len().min(seq_len);
            ids.extend_from_slice(&enc.get_ids()[..keep]);
            mask.extend_from_slice(&enc.get_attention_mask()[..keep]);
            for _ in keep..seq_len {
                ids.push(0u32);
                mask.push(0u32);
            }
        }

        let input_ids = Tensor::from_vec(ids, (rows, seq_len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask, (rows, seq_len), &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let sentences = mean_pool(&hidden, &attention_mask)?.to_vec2::<f32>()?;
        Ok(sentences.into_iter().map(Embedding::new).collect())
    }
}

/// Average token vectors weighted by the attention mask, so padding
/// positions drop out of the sentence vector.
fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor, EmbeddingError> {
    let mask = attention_mask
        .unsqueeze(2)?
        .broadcast_as(hidden.shape())?
        .to_dtype(DType::F32)?;

    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let token_counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;

    Ok(summed.broadcast_div(&token_counts)?)
}

impl TextEmbedder for CandleEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let texts = [text.to_string()];
        let embeddings = self.encode_batch(&texts)?;
        Ok(embeddings.into_iter().next().unwrap())
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(count = texts.len(), "Encoding batch");

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(ENCODE_CHUNK) {
            embeddings.extend(self.encode_chunk(chunk)?);
        }

        debug!(vectors = embeddings.len(), dim = EMBEDDING_DIM, "Batch encoded");

        Ok(embeddings)
    }
}
