//! # advisor-embeddings
//!
//! Local sentence embeddings for fin-advisor using Candle.
//!
//! Every question in the knowledge base, and every incoming user query, is
//! mapped to a fixed-length vector by the same model instance so that
//! cosine similarity between them is meaningful.
//!
//! ## Features
//! - Local inference via Candle (no Python, no API)
//! - all-MiniLM-L6-v2 by default (384 dimensions, mean pooling)
//! - Automatic model file caching; works offline after the first download
//! - Chunked batch encoding so large knowledge bases stay memory-bounded

pub mod cache;
pub mod candle;
pub mod error;
pub mod model;

pub use crate::candle::{CandleEmbedder, EMBEDDING_DIM, MAX_SEQ_LENGTH};
pub use cache::{get_or_download_model, ModelCache, ModelPaths, DEFAULT_MODEL_REPO, MODEL_FILES};
pub use error::EmbeddingError;
pub use model::{Embedding, ModelInfo, TextEmbedder};
