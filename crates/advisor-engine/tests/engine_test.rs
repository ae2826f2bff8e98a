//! End-to-end engine behavior over a real HNSW index, driven with a
//! deterministic hashing embedder and the mock backend.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use advisor_backend::MockBackend;
use advisor_embeddings::{Embedding, EmbeddingError, ModelInfo, TextEmbedder};
use advisor_engine::{ReplySource, ResponseEngine, CACHED_MARKER, EMPTY_QUERY_REPLY};
use advisor_index::{FaqIndex, HnswFaqIndex};
use advisor_types::FaqEntry;

const DIM: usize = 16;

/// Bag-of-words hashing embedder. Deterministic, and similar wording
/// yields similar vectors, which is all retrieval tests need.
struct HashEmbedder {
    info: ModelInfo,
}

impl HashEmbedder {
    fn new() -> Self {
        Self {
            info: ModelInfo {
                name: "test-hash".to_string(),
                dimension: DIM,
                max_sequence_length: 64,
            },
        }
    }
}

impl TextEmbedder for HashEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut values = vec![0.0f32; DIM];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            values[hasher.finish() as usize % DIM] += 1.0;
        }
        Ok(Embedding::new(values))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

/// Embedder that always fails, for the degraded-retrieval path.
struct BrokenEmbedder {
    info: ModelInfo,
}

impl BrokenEmbedder {
    fn new() -> Self {
        Self {
            info: ModelInfo {
                name: "broken".to_string(),
                dimension: DIM,
                max_sequence_length: 64,
            },
        }
    }
}

impl TextEmbedder for BrokenEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn encode(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        Err(EmbeddingError::Tokenizer("encoder offline".to_string()))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

const FAQ_ROWS: &[(&str, &str)] = &[
    ("What is a mutual fund?", "A pooled investment vehicle."),
    (
        "How do I start an emergency fund?",
        "Save three to six months of expenses in liquid savings.",
    ),
    (
        "What is compound interest?",
        "Interest earned on both principal and accumulated interest.",
    ),
    (
        "Should I pay off debt before investing?",
        "Clear high-interest debt first.",
    ),
];

fn build_index(embedder: &HashEmbedder, rows: &[(&str, &str)]) -> HnswFaqIndex {
    let index = HnswFaqIndex::with_dimension(DIM).expect("index construction");
    let entries: Vec<FaqEntry> = rows
        .iter()
        .enumerate()
        .map(|(i, (q, a))| FaqEntry::new(i as u64, *q, *a))
        .collect();
    let questions: Vec<String> = rows.iter().map(|(q, _)| q.to_string()).collect();
    let embeddings = embedder.encode_batch(&questions).expect("encode rows");
    index.add_batch(entries, &embeddings).expect("load rows");
    index
}

fn build_engine(
    backend: Arc<MockBackend>,
) -> ResponseEngine<HashEmbedder, HnswFaqIndex, MockBackend> {
    let embedder = HashEmbedder::new();
    let index = build_index(&embedder, FAQ_ROWS);
    ResponseEngine::new(Arc::new(embedder), Arc::new(index), backend)
}

#[tokio::test]
async fn test_fresh_answer_generates_counts_and_caches() {
    let backend = Arc::new(MockBackend::with_reply("Diversify across asset classes."));
    let engine = build_engine(backend.clone());

    let reply = engine.answer("What is a mutual fund?").await;

    assert_eq!(reply.source, ReplySource::Fresh);
    assert_eq!(reply.text, "Diversify across asset classes.");
    assert!(!reply.is_error());
    assert_eq!(backend.calls(), 1);

    let stats = engine.stats();
    assert_eq!(stats.total_queries, 1);
    assert_eq!(stats.cache_entries, 1);
}

#[tokio::test]
async fn test_fresh_answer_text_is_trimmed() {
    let backend = Arc::new(MockBackend::with_reply("  Padded answer text.\n\n"));
    let engine = build_engine(backend);

    let reply = engine.answer("what is compound interest?").await;

    assert_eq!(reply.text, "Padded answer text.");
    // The trimmed form is what gets cached
    let cached = engine.answer("what is compound interest?").await;
    assert_eq!(cached.text, format!("Padded answer text.{CACHED_MARKER}"));
}

#[tokio::test]
async fn test_repeat_query_hits_cache_with_marker() {
    let backend = Arc::new(MockBackend::with_reply("A pooled vehicle, in short."));
    let engine = build_engine(backend.clone());

    let first = engine.answer("What is a mutual fund?").await;
    // Different case, punctuation, and spacing; same normalized key
    let second = engine.answer("  what is a MUTUAL fund???  ").await;

    assert_eq!(second.source, ReplySource::Cached);
    assert_eq!(second.text, format!("{}{}", first.text, CACHED_MARKER));
    assert!(second.text.ends_with("\n\n(Cached response)"));
    assert_eq!(backend.calls(), 1);
    assert_eq!(engine.stats().total_queries, 1);
    assert_eq!(engine.stats().cache_entries, 1);
}

#[tokio::test]
async fn test_expired_entry_triggers_fresh_generation() {
    let backend = Arc::new(MockBackend::with_reply("answer"));
    let engine = build_engine(backend.clone()).with_cache_ttl(Duration::from_millis(40));

    engine.answer("what is compound interest").await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    let reply = engine.answer("what is compound interest").await;

    assert_eq!(reply.source, ReplySource::Fresh);
    assert_eq!(backend.calls(), 2);
    assert_eq!(engine.stats().total_queries, 2);
}

#[tokio::test]
async fn test_empty_query_short_circuits() {
    let backend = Arc::new(MockBackend::with_reply("unused"));
    let engine = build_engine(backend.clone());

    for query in ["", "   ", "\t\n"] {
        let reply = engine.answer(query).await;
        assert_eq!(reply.source, ReplySource::EmptyQuery);
        assert_eq!(reply.text, EMPTY_QUERY_REPLY);
    }

    assert_eq!(backend.calls(), 0);
    let stats = engine.stats();
    assert_eq!(stats.total_queries, 0);
    assert_eq!(stats.cache_entries, 0);
}

#[tokio::test]
async fn test_backend_failure_degrades_and_is_cached() {
    let backend = Arc::new(MockBackend::failing("quota exceeded"));
    let engine = build_engine(backend.clone());

    let first = engine.answer("should I pay off debt first?").await;

    assert_eq!(first.source, ReplySource::Failed);
    assert!(first.is_error());
    assert!(first.text.starts_with("Backend Error:"));
    assert!(first.text.contains("quota exceeded"));
    assert_eq!(engine.stats().total_queries, 1);

    // The error text is served from cache within the TTL; the failing
    // backend is not hammered with the same query again
    let second = engine.answer("Should I pay off debt first?").await;
    assert_eq!(second.source, ReplySource::Cached);
    assert_eq!(second.text, format!("{}{}", first.text, CACHED_MARKER));
    assert_eq!(backend.calls(), 1);
    assert_eq!(engine.stats().total_queries, 1);
}

#[tokio::test]
async fn test_retrieval_failure_is_not_cached_or_counted() {
    let backend = Arc::new(MockBackend::with_reply("unused"));
    let index = HnswFaqIndex::with_dimension(DIM).expect("index construction");
    let engine = ResponseEngine::new(
        Arc::new(BrokenEmbedder::new()),
        Arc::new(index),
        backend.clone(),
    );

    let reply = engine.answer("what is a bond?").await;

    assert_eq!(reply.source, ReplySource::Failed);
    assert!(reply.text.starts_with("Error:"));
    assert!(reply.text.contains("encoder offline"));
    assert_eq!(backend.calls(), 0);

    let stats = engine.stats();
    assert_eq!(stats.total_queries, 0);
    assert_eq!(stats.cache_entries, 0);
}

#[tokio::test]
async fn test_mutual_fund_row_lands_in_prompt_context() {
    let backend = Arc::new(MockBackend::with_reply("It pools investor money."));
    let engine = build_engine(backend.clone());

    let reply = engine.answer("what is a mutual Fund?").await;
    assert_eq!(reply.source, ReplySource::Fresh);

    let prompt = backend.last_prompt().expect("backend was called");
    assert!(prompt.contains("1. Q: What is a mutual fund?\nA: A pooled investment vehicle."));
    assert!(prompt.contains("User Question: what is a mutual Fund?"));
}

#[tokio::test]
async fn test_small_knowledge_base_yields_short_context() {
    let backend = Arc::new(MockBackend::with_reply("ok"));
    let embedder = HashEmbedder::new();
    let index = build_index(&embedder, &FAQ_ROWS[..1]);
    let engine = ResponseEngine::new(Arc::new(embedder), Arc::new(index), backend.clone());

    let reply = engine.answer("what is a mutual fund?").await;
    assert_eq!(reply.source, ReplySource::Fresh);

    // top_k is 3 but only one entry exists; the context formats what is
    // available instead of padding or erroring
    let prompt = backend.last_prompt().expect("backend was called");
    assert!(prompt.contains("1. Q:"));
    assert!(!prompt.contains("2. Q:"));
}

#[tokio::test]
async fn test_distinct_queries_generate_separately() {
    let backend = Arc::new(MockBackend::echoing());
    let engine = build_engine(backend.clone());

    engine.answer("What is a mutual fund?").await;
    engine.answer("How do I start an emergency fund?").await;

    assert_eq!(backend.calls(), 2);
    let stats = engine.stats();
    assert_eq!(stats.total_queries, 2);
    assert_eq!(stats.cache_entries, 2);
}

#[tokio::test]
async fn test_categorize_skips_retrieval_and_cache() {
    let backend = Arc::new(MockBackend::with_reply("Transport"));
    let engine = build_engine(backend.clone());

    let category = engine
        .categorize("Uber to airport", 432.5)
        .await
        .expect("categorize");

    assert_eq!(category, "Transport");
    let prompt = backend.last_prompt().expect("backend was called");
    assert!(prompt.contains("'Uber to airport'"));
    assert!(prompt.contains("₹432.5"));
    assert!(!prompt.contains("Context:"));

    let stats = engine.stats();
    assert_eq!(stats.total_queries, 0);
    assert_eq!(stats.cache_entries, 0);
}

#[tokio::test]
async fn test_categorize_blank_description() {
    let backend = Arc::new(MockBackend::with_reply("unused"));
    let engine = build_engine(backend.clone());

    let category = engine.categorize("   ", 100.0).await.expect("categorize");

    assert_eq!(category, "Uncategorized");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_categorize_propagates_backend_failure() {
    let backend = Arc::new(MockBackend::failing("backend down"));
    let engine = build_engine(backend);

    assert!(engine.categorize("coffee", 4.5).await.is_err());
}

#[tokio::test]
async fn test_initial_stats() {
    let backend = Arc::new(MockBackend::with_reply("unused"));
    let engine = build_engine(backend);

    let stats = engine.stats();
    assert_eq!(stats.total_queries, 0);
    assert_eq!(stats.cache_entries, 0);
    assert_eq!(stats.session_minutes, 0);
}
