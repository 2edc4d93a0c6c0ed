//! Summarization pass backed by the larger model.

use crate::openai::client::{ChatClient, OpenAiError};
use crate::openai::types::{ChatRequest, Message};

const SYSTEM_PROMPT: &str = "You are a helpful summarizer.";

/// Asks `model` for a summary of `text` with default sampling. Unlike the
/// spell pass, faults propagate to the caller.
pub async fn summarize(
    client: &impl ChatClient,
    model: &str,
    text: &str,
) -> Result<String, OpenAiError> {
    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!("Summarize the following:\n\n{text}")),
        ],
        temperature: None,
        max_tokens: None,
    };
    client.complete(request).await
}
