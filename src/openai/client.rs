use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ApiError, ChatRequest, ChatResponse};

/// Default endpoint of a local Ollama server's OpenAI-compatible API.
const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
/// Local servers ignore the key but the wire format requires one.
const DEFAULT_API_KEY: &str = "ollama";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(&'static str),
}

/// Abstraction over the chat-completion endpoint.
/// Implemented by `OpenAiClient` for production; mock implementations used in tests.
pub trait ChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, OpenAiError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(http: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `VALET_BASE_URL` and `VALET_API_KEY`, falling back to a local
    /// Ollama endpoint with its placeholder credential.
    pub fn from_env(http: Client) -> Self {
        let base_url = env_or("VALET_BASE_URL", DEFAULT_BASE_URL);
        let api_key = env_or("VALET_API_KEY", DEFAULT_API_KEY);
        Self::new(http, &base_url, &api_key)
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self::new(http, base_url, "test-key")
    }
}

fn env_or(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ChatClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key.0)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<ChatResponse>(&text)
                && let Some(err) = &body.error
            {
                let classified = api_error(status.as_u16(), err);
                warn!(error = %classified, "chat completion failed");
                return Err(classified);
            }
            let snippet = if text.len() > 200 { &text[..200] } else { &text };
            warn!(status = %status, "chat completion failed (no structured body)");
            return Err(OpenAiError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {snippet}"),
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .and_then(|mut choices| {
                if choices.is_empty() {
                    None
                } else {
                    Some(choices.swap_remove(0))
                }
            })
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(OpenAiError::Malformed("response contained no message content"))?;

        debug!(model = %request.model, chars = content.len(), "chat completion received");
        Ok(content)
    }
}

fn api_error(code: u16, err: &ApiError) -> OpenAiError {
    let message = match (&err.message, &err.kind) {
        (Some(message), Some(kind)) => format!("{message} ({kind})"),
        (Some(message), None) => message.clone(),
        (None, _) => "unknown error".to_string(),
    };
    OpenAiError::Api { code, message }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{ChatClient, OpenAiError};
    use crate::openai::types::ChatRequest;

    /// In-process stand-in for the remote service: hands out scripted
    /// replies in order and records every request it saw.
    pub(crate) struct ScriptedChat {
        responses: Mutex<VecDeque<Result<String, OpenAiError>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedChat {
        pub(crate) fn new(
            responses: impl IntoIterator<Item = Result<String, OpenAiError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn replying<const N: usize>(replies: [&str; N]) -> Self {
            Self::new(replies.into_iter().map(|r| Ok(r.to_string())))
        }

        pub(crate) fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ChatClient for ScriptedChat {
        async fn complete(&self, request: ChatRequest) -> Result<String, OpenAiError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(OpenAiError::Malformed("no scripted response")))
        }
    }
}
