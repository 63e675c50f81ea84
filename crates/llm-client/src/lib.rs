//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait for the three input shapes the pipeline sends to a generative
//! backend (plain text, text + image, text + document), with Gemini and OpenAI implementations.
//! [`GenerationFacade`] wraps any client and turns every failure into a fixed fallback string.

use anyhow::Result;
use async_trait::async_trait;

mod config;
mod gemini_llm;
mod generation;
mod openai_llm;

pub use config::{LlmConfig, LlmProvider};
pub use gemini_llm::{GeminiLlmClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
pub use generation::{
    GenerationFacade, DESCRIPTION_FALLBACK, DOCUMENT_PROMPT, GENERATION_FALLBACK, IMAGE_PROMPT,
};
pub use openai_llm::{OpenAILlmClient, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

/// Default cap on generated tokens per request.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Generative backend. Implementations return an error for transport failures, non-success
/// statuses and empty completions; they never retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Text completion for a single user prompt.
    async fn complete_text(&self, prompt: &str) -> Result<String>;

    /// Completion for a prompt plus one image.
    async fn describe_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String>;

    /// Completion for a prompt plus one binary document of the given MIME type.
    async fn describe_document(
        &self,
        prompt: &str,
        document: &[u8],
        mime_type: &str,
    ) -> Result<String>;
}

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head: String = chars[..7].iter().collect();
        let tail: String = chars[len - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}
