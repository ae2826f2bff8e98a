//! Query normalization for cache keys.

/// Normalize a query into its canonical cache-key form.
///
/// Lowercases, maps punctuation to spaces, collapses whitespace runs,
/// and trims, so phrasings that differ only in case, punctuation, or
/// spacing share one cache entry. Alphanumerics and underscores
/// survive; everything else becomes a separator.
pub fn normalize_query(query: &str) -> String {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
