//! Embedding error types.

use thiserror::Error;

/// Errors raised while loading the model or encoding text.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Candle tensor or model error
    #[error("Model inference failed: {0}")]
    Candle(#[from] candle_core::Error),

    /// Tokenizer failure
    #[error("Tokenization failed: {0}")]
    Tokenizer(String),

    /// Model file missing or unparseable
    #[error("Model files unavailable: {0}")]
    ModelNotFound(String),

    /// Model download failure
    #[error("Model download failed: {0}")]
    Download(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
