//! Client for an OpenAI-compatible chat-completion endpoint (Ollama by default).

pub mod client;
pub mod types;
