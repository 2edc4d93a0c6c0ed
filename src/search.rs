//! Stand-in for a web search backend.

/// Synthesizes a canned result blurb from the extracted keywords.
///
/// Indexes the first keyword directly: `keywords` must be non-empty, and an
/// empty slice panics. The router only reaches this after keyword
/// extraction, which can still come up empty for short-word queries.
pub fn mock_results(keywords: &[String]) -> String {
    format!(
        "Search results for: {}. Example content about {} and its importance.",
        keywords.join(", "),
        keywords[0]
    )
}
