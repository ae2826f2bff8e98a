//! Gemini REST client.

use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use async_trait::async_trait;

use crate::{BackendError, GenerativeBackend};

/// Default Gemini API endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL
    pub base_url: String,

    /// Model name (e.g., "gemini-2.5-flash")
    pub model: String,

    /// API key
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum attempts per call
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Config for the public Gemini API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Client for the Gemini `generateContent` API.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client.
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Model this client generates with.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Call the API with retry logic.
    async fn call_api(&self, prompt: &str) -> Result<String, BackendError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(120)),
            ..Default::default()
        };

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, model = %self.config.model, "Calling generation API");

            match self.make_request(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts >= self.config.max_retries {
                        error!(error = %e, "Retry budget exhausted");
                        return Err(e);
                    }

                    let Some(delay) = backoff.next_backoff() else {
                        error!(error = %e, "Backoff window closed");
                        return Err(e);
                    };
                    warn!(
                        error = %e,
                        delay_ms = delay.as_millis(),
                        "Generation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Make a single `generateContent` request.
    async fn make_request(&self, prompt: &str) -> Result<String, BackendError> {
        #[derive(Serialize)]
        struct GenerateRequest {
            contents: Vec<RequestContent>,
        }

        #[derive(Serialize)]
        struct RequestContent {
            parts: Vec<RequestPart>,
        }

        #[derive(Serialize)]
        struct RequestPart {
            text: String,
        }

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout
                } else {
                    BackendError::Api(e.to_string())
                }
            })?;

        if response.status() == 429 {
            return Err(BackendError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Api(e.to_string()))?;

        parse_generated_text(&body)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Pull the generated text out of a `generateContent` response body.
///
/// Text parts of the first candidate are concatenated; a structurally
/// valid response with no text at all maps to [`BackendError::EmptyResponse`].
fn parse_generated_text(body: &str) -> Result<String, BackendError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;

    let text: String = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(BackendError::EmptyResponse);
    }

    Ok(text)
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self.call_api(prompt).await
    }
}
