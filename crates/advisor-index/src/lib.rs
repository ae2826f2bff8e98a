//! # advisor-index
//!
//! In-memory vector index over the fin-advisor knowledge base.
//!
//! Each indexed entry is a (vector, question, answer) triple: the question
//! text is the indexed document, the answer rides along as metadata. The
//! index is populated once at startup by the dataset loader and is
//! read-only afterwards, so it lives entirely in memory for the process
//! lifetime.
//!
//! ## Features
//! - usearch-powered HNSW index with cosine similarity
//! - Bulk insertion with contiguous-id enforcement
//! - k-nearest-neighbor search returning full question/answer payloads

pub mod error;
pub mod hnsw;
pub mod index;

pub use error::IndexError;
pub use hnsw::{HnswFaqIndex, HnswSettings};
pub use index::{FaqIndex, IndexStats, ScoredFaq};
