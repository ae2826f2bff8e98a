//! The response engine.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use advisor_backend::{BackendError, GenerativeBackend};
use advisor_embeddings::TextEmbedder;
use advisor_index::FaqIndex;

use crate::cache::{ResponseCache, CACHED_MARKER, DEFAULT_CACHE_TTL};
use crate::normalize::normalize_query;
use crate::prompt;
use crate::retrieve::ContextRetriever;

/// Default number of knowledge-base entries retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Reply text for a blank query.
pub const EMPTY_QUERY_REPLY: &str = "Please enter a message.";

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplySource {
    /// Freshly generated by the backend
    Fresh,
    /// Served from the response cache
    Cached,
    /// Degraded to error text after a backend or retrieval failure
    Failed,
    /// The query was blank; nothing was retrieved or generated
    EmptyQuery,
}

/// Answer to a single query.
///
/// `text` is the full user-facing answer (cached replies carry the cache
/// marker); `source` is the machine-readable tag for callers that need
/// to detect failures or cache hits without parsing the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Answer text as shown to the user
    pub text: String,
    /// How the text was produced
    pub source: ReplySource,
}

impl Reply {
    fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// True when this reply carries failure text instead of an answer.
    pub fn is_error(&self) -> bool {
        self.source == ReplySource::Failed
    }
}

/// Session counters reported by [`ResponseEngine::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Queries answered through the miss path this session
    pub total_queries: u64,
    /// Entries currently held by the response cache
    pub cache_entries: usize,
    /// Whole minutes since the engine was constructed
    pub session_minutes: i64,
}

/// Retrieval-augmented response engine.
///
/// Owns the response cache and session counters; one instance is shared
/// by all concurrent callers. The index must be fully loaded before the
/// engine is built; it is treated as read-only from here on.
pub struct ResponseEngine<E, I, B>
where
    E: TextEmbedder + 'static,
    I: FaqIndex,
    B: GenerativeBackend,
{
    retriever: ContextRetriever<E, I>,
    backend: Arc<B>,
    cache: ResponseCache,
    top_k: usize,
    total_queries: AtomicU64,
    session_start: DateTime<Utc>,
}

// Manual impl: the embedder, index, and backend hold model/FFI state
// that is not `Debug`, so a derive cannot apply here.
impl<E, I, B> fmt::Debug for ResponseEngine<E, I, B>
where
    E: TextEmbedder + 'static,
    I: FaqIndex,
    B: GenerativeBackend,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseEngine")
            .field("top_k", &self.top_k)
            .field("total_queries", &self.total_queries)
            .field("session_start", &self.session_start)
            .finish_non_exhaustive()
    }
}

impl<E, I, B> ResponseEngine<E, I, B>
where
    E: TextEmbedder + 'static,
    I: FaqIndex,
    B: GenerativeBackend,
{
    /// Create an engine over a loaded index.
    pub fn new(embedder: Arc<E>, index: Arc<I>, backend: Arc<B>) -> Self {
        Self {
            retriever: ContextRetriever::new(embedder, index),
            backend,
            cache: ResponseCache::new(DEFAULT_CACHE_TTL),
            top_k: DEFAULT_TOP_K,
            total_queries: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    /// Set how many context entries each query retrieves.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set how long answers stay cached.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = ResponseCache::new(ttl);
        self
    }

    /// Answer a query.
    ///
    /// Total over its input: retrieval and backend failures degrade to
    /// an error-text reply rather than an `Err`. Cache hits return the
    /// stored answer with [`CACHED_MARKER`] appended and do not touch
    /// the counter; every answered miss increments it exactly once and
    /// stores its answer, error text included.
    pub async fn answer(&self, query: &str) -> Reply {
        if query.trim().is_empty() {
            return Reply::new(EMPTY_QUERY_REPLY, ReplySource::EmptyQuery);
        }

        let key = normalize_query(query);

        if let Some(cached) = self.cache.lookup(&key) {
            debug!(key = %key, "Cache hit");
            return Reply::new(format!("{cached}{CACHED_MARKER}"), ReplySource::Cached);
        }

        let context = match self.retriever.retrieve(query, self.top_k).await {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "Context retrieval failed");
                return Reply::new(format!("Error: {e}"), ReplySource::Failed);
            }
        };

        let prompt = prompt::answer_prompt(&context, query);

        let (text, source) = match self.backend.generate(&prompt).await {
            Ok(text) => (text.trim().to_string(), ReplySource::Fresh),
            Err(e) => {
                warn!(error = %e, "Backend call failed");
                (format!("Backend Error: {e}"), ReplySource::Failed)
            }
        };

        self.cache.store(&key, &text);
        self.total_queries.fetch_add(1, Ordering::SeqCst);

        Reply::new(text, source)
    }

    /// Classify a transaction description into one spending category.
    ///
    /// Goes straight to the backend; retrieval and the answer cache are
    /// not involved. A blank description is `"Uncategorized"` without a
    /// backend call.
    pub async fn categorize(
        &self,
        description: &str,
        amount: f64,
    ) -> Result<String, BackendError> {
        if description.trim().is_empty() {
            return Ok("Uncategorized".to_string());
        }

        let prompt = prompt::categorize_prompt(description, amount);
        let category = self.backend.generate(&prompt).await?;
        Ok(category.trim().to_string())
    }

    /// Session counters.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_queries: self.total_queries.load(Ordering::SeqCst),
            cache_entries: self.cache.len(),
            session_minutes: (Utc::now() - self.session_start).num_minutes(),
        }
    }
}
