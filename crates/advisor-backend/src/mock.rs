//! Mock backend for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{BackendError, GenerativeBackend};

/// What the mock does with each prompt.
enum MockMode {
    /// Return the same canned text every time.
    Reply(String),
    /// Return the prompt itself.
    Echo,
    /// Fail with an API error carrying this detail.
    Fail(String),
}

/// Mock backend that generates deterministic responses.
///
/// Records every prompt it receives so tests can assert on call
/// counts and prompt contents without making API calls.
pub struct MockBackend {
    mode: Mutex<MockMode>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Mock that always returns the given text.
    pub fn with_reply(text: impl Into<String>) -> Self {
        Self {
            mode: Mutex::new(MockMode::Reply(text.into())),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock that returns each prompt unchanged.
    pub fn echoing() -> Self {
        Self {
            mode: Mutex::new(MockMode::Echo),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock that fails every call with an API error.
    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            mode: Mutex::new(MockMode::Fail(detail.into())),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Switch to returning the given canned text.
    pub fn set_reply(&self, text: impl Into<String>) {
        *self.mode.lock().unwrap() = MockMode::Reply(text.into());
    }

    /// Switch to failing with the given detail.
    pub fn set_failure(&self, detail: impl Into<String>) {
        *self.mode.lock().unwrap() = MockMode::Fail(detail.into());
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most recent prompt, if any call was made.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::with_reply("Mock response.")
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match &*self.mode.lock().unwrap() {
            MockMode::Reply(text) => Ok(text.clone()),
            MockMode::Echo => Ok(prompt.to_string()),
            MockMode::Fail(detail) => Err(BackendError::Api(detail.clone())),
        }
    }
}
