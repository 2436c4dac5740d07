//! Suggestion generation through an OpenAI-compatible chat-completions gateway.

pub mod client;
pub mod client_impl;
pub mod prompts;

use thiserror::Error;

pub use client::{LlmClient, MockLlmClient};
pub use client_impl::ChatCompletionsClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM gateway rate limit exceeded")]
    RateLimited,

    #[error("LLM gateway error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM request failed: {0}")]
    Transport(String),

    #[error("No choices in LLM response")]
    EmptyResponse,
}

/// A system + user message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}
