//! Keyword extraction for the search pipeline.

/// Splits on whitespace and keeps tokens longer than four characters,
/// stripping sentence punctuation from both ends of the survivors.
///
/// The length check runs on the raw split token, before punctuation is
/// stripped, so `"cats!"` survives while the bare `"cats"` would not.
/// Order and duplicates are preserved.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|word| word.chars().count() > 4)
        .map(|word| {
            word.trim_matches(|c| matches!(c, '.' | ',' | '!' | '?'))
                .to_string()
        })
        .collect()
}
