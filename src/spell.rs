//! Spell-correction pass backed by a small, fast model.

use tracing::{debug, warn};

use crate::openai::client::{ChatClient, OpenAiError};
use crate::openai::types::{ChatRequest, Message};

/// The correction contract. The model must change nothing but spelling,
/// so downstream routing and keyword extraction see the user's own words.
const SYSTEM_PROMPT: &str = r#"You are an expert spell checker. Your ONLY job is to correct spelling mistakes.

CRITICAL RULES:
1. ONLY fix obvious spelling errors - do NOT change correctly spelled words
2. Preserve the original meaning, grammar, and sentence structure exactly
3. Do NOT rephrase, rewrite, or change the wording
4. Do NOT change numbers, math expressions, or mathematical operators (+, -, *, /, =)
5. Do NOT add or remove words
6. Do NOT change capitalization unless it's clearly wrong
7. If a word could be spelled multiple ways, choose the most common spelling
8. If you're unsure about a word, leave it unchanged
9. Return ONLY the corrected text with no explanations or comments
10. Do NOT add phrases like "Corrected text:", "Output:", or any prefixes

Examples:
- Input: "I want to lern about artifical inteligence"
  Output: "I want to learn about artificial intelligence"
- Input: "25+25"
  Output: "25+25"
- Input: "What is machine learning?"
  Output: "What is machine learning?"
- Input: "Searh for informaton about quantim computing"
  Output: "Search for information about quantum computing"
"#;

/// Output-length cap: generous multiple of the input word count.
const MAX_TOKENS_PER_WORD: u32 = 3;

/// Outcome of a spell-check pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellCheck {
    /// The service returned text that differs from the input
    /// (ignoring case and surrounding whitespace).
    Corrected(String),
    /// The service returned the input unchanged.
    Unchanged,
    /// The remote call failed; callers proceed with the original text.
    ServiceFailed(String),
}

impl SpellCheck {
    /// The text downstream processing should use.
    pub fn effective_text<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            SpellCheck::Corrected(text) => text,
            SpellCheck::Unchanged | SpellCheck::ServiceFailed(_) => original,
        }
    }

    pub fn was_corrected(&self) -> bool {
        matches!(self, SpellCheck::Corrected(_))
    }
}

/// Asks `model` to fix spelling in `text`, leaving everything else intact.
///
/// Sampling is pinned to temperature 0 for stable corrections. A failed
/// call degrades to the original text rather than surfacing an error.
pub async fn check(client: &impl ChatClient, model: &str, text: &str) -> SpellCheck {
    let word_count = text.split_whitespace().count().max(1) as u32;
    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!(
                "Correct only the spelling errors in this text:\n\n{text}"
            )),
        ],
        temperature: Some(0.0),
        max_tokens: Some(word_count * MAX_TOKENS_PER_WORD),
    };

    let reply = match client.complete(request).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "spell check failed, keeping original text");
            return SpellCheck::ServiceFailed(e.to_string());
        }
    };

    // Models occasionally quote the corrected text despite rule 10.
    let corrected = reply.trim().replace('"', "");

    if corrected.to_lowercase() == text.trim().to_lowercase() {
        SpellCheck::Unchanged
    } else {
        debug!("spelling corrections applied");
        SpellCheck::Corrected(corrected)
    }
}
