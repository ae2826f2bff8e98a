//! # advisor-dataset
//!
//! Knowledge base loading for fin-advisor.
//!
//! Reads a CSV dataset of question/answer pairs (`input`/`output`
//! columns), drops incomplete rows, encodes every surviving question in
//! one embedder batch call, and bulk-inserts the result into the vector
//! index in fixed-size chunks.
//!
//! Any failure here is fatal to engine construction: without a knowledge
//! base there is nothing to ground answers in.

pub mod error;
pub mod loader;
pub mod reader;

pub use error::DatasetError;
pub use loader::{load_knowledge_base, LoadReport, DEFAULT_LOAD_BATCH_SIZE};
pub use reader::read_faq_csv;
