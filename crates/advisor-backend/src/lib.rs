//! # advisor-backend
//!
//! Generative backend client for fin-advisor.
//!
//! The response engine hands this crate a fully-assembled prompt and gets
//! plain text back. Every transport, API, and parse failure is converted
//! into a typed [`BackendError`]; nothing here panics or leaks a raw
//! transport error to callers.

mod gemini;
mod mock;

pub use gemini::{GeminiClient, GeminiConfig, GEMINI_BASE_URL};
pub use mock::MockBackend;

use async_trait::async_trait;
use thiserror::Error;

/// One-line prompt used by the startup liveness probe.
pub const CONNECTION_PROBE_PROMPT: &str = "Connection test successful.";

/// Errors raised by a generative backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure or non-success HTTP status
    #[error("Generation request failed: {0}")]
    Api(String),

    /// Response body did not match the expected schema
    #[error("Malformed API response: {0}")]
    Parse(String),

    /// HTTP 429 from the backend
    #[error("Rate limit hit, try again later")]
    RateLimited,

    /// The backend answered but produced no usable text
    #[error("No valid response generated")]
    EmptyResponse,

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Client could not be constructed
    #[error("Bad client configuration: {0}")]
    Config(String),
}

/// Remote text-generation service.
///
/// Implementations must be `Send + Sync`; one client instance is shared by
/// all concurrent engine callers.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate text for a fully-assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;

    /// Cheap liveness check: send a one-line prompt and discard the
    /// reply. Used once at startup; a failure is advisory, not fatal.
    async fn probe(&self) -> Result<(), BackendError> {
        self.generate(CONNECTION_PROBE_PROMPT).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BackendError::Api("boom".to_string()).to_string(),
            "API request failed: boom"
        );
        assert_eq!(
            BackendError::EmptyResponse.to_string(),
            "No valid response generated"
        );
        assert_eq!(
            BackendError::RateLimited.to_string(),
            "Rate limit hit, try again later"
        );
    }
}
