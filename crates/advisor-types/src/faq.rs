//! Knowledge base records.

use serde::{Deserialize, Serialize};

/// One question/answer pair from the knowledge base.
///
/// Entries are immutable once loaded: the dataset loader assigns ids from
/// the row's position in the filtered dataset (contiguous, 0-based) and the
/// vector index owns the entries for the rest of the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// Position in the filtered dataset; unique per load.
    pub id: u64,
    /// The indexed document text.
    pub question: String,
    /// Grounding answer carried as metadata alongside the question.
    pub answer: String,
}

impl FaqEntry {
    pub fn new(id: u64, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
        }
    }
}
