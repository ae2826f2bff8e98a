//! Retrieval-augmented response engine for financial Q&A.
//!
//! Ties the embedder, vector index, knowledge base loader, and
//! generative backend together behind one cached query surface:
//! normalize the query, check the response cache, retrieve grounding
//! context, assemble the prompt, call the backend, cache the answer.
//! [`bootstrap`] builds the production wiring from [`advisor_types::Settings`];
//! [`ResponseEngine`] is the generic core that tests drive with mocks.

mod bootstrap;
mod cache;
mod engine;
mod error;
mod normalize;
mod prompt;
mod retrieve;

pub use bootstrap::{bootstrap, FinanceEngine};
pub use cache::{ResponseCache, CACHED_MARKER, DEFAULT_CACHE_TTL};
pub use engine::{
    EngineStats, Reply, ReplySource, ResponseEngine, DEFAULT_TOP_K, EMPTY_QUERY_REPLY,
};
pub use error::EngineError;
pub use normalize::normalize_query;
pub use retrieve::ContextRetriever;
