//! Prompt construction.

/// Spending categories offered to the classifier.
const CATEGORIES: &str =
    "['Food', 'Transport', 'Utilities', 'Shopping', 'Investment', 'Salary', 'Other']";

/// Build the grounded-answer prompt from retrieved context and the raw
/// user question.
pub(crate) fn answer_prompt(context: &str, user_query: &str) -> String {
    let context = context.trim_end();
    format!(
        r#"You are a helpful, trustworthy financial assistant.
Use the dataset context below to answer the user's question accurately.

Context:
{context}

User Question: {user_query}

Answer clearly in under 150 words and provide one actionable insight if possible."#
    )
}

/// Build the transaction-classification prompt.
pub(crate) fn categorize_prompt(description: &str, amount: f64) -> String {
    format!(
        "Classify this transaction: '{description}' for ₹{amount}. \
         Categories: {CATEGORIES}.\nReturn only one best category."
    )
}
