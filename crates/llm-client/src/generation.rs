//! Failure-containing facade over an [`LlmClient`].

use std::sync::Arc;
use tracing::warn;

use crate::LlmClient;

/// Returned by [`GenerationFacade::complete_text`] when the backend fails.
pub const GENERATION_FALLBACK: &str = "Sorry, I'm having trouble connecting to the AI service.";
/// Returned by the describe operations when the backend fails.
pub const DESCRIPTION_FALLBACK: &str = "Could not describe the file.";

pub const IMAGE_PROMPT: &str = "Give summary/analysis of this image";
pub const DOCUMENT_PROMPT: &str = "Summarize this document";

/// Wraps a generative backend; every operation returns a string, never an error.
///
/// Errors and blank completions are logged at `warn` and replaced by a fixed fallback.
#[derive(Clone)]
pub struct GenerationFacade {
    client: Arc<dyn LlmClient>,
}

impl GenerationFacade {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn complete_text(&self, prompt: &str) -> String {
        self.complete_text_or(prompt, GENERATION_FALLBACK).await
    }

    /// Like [`complete_text`](Self::complete_text) with a caller-chosen fallback.
    pub async fn complete_text_or(&self, prompt: &str, fallback: &str) -> String {
        let result = self.client.complete_text(prompt).await;
        or_fallback(result, fallback, "complete_text")
    }

    pub async fn describe_image(&self, image: &[u8], mime_type: &str) -> String {
        let result = self
            .client
            .describe_image(IMAGE_PROMPT, image, mime_type)
            .await;
        or_fallback(result, DESCRIPTION_FALLBACK, "describe_image")
    }

    pub async fn describe_document(&self, document: &[u8], mime_type: &str) -> String {
        let result = self
            .client
            .describe_document(DOCUMENT_PROMPT, document, mime_type)
            .await;
        or_fallback(result, DESCRIPTION_FALLBACK, "describe_document")
    }
}

fn or_fallback(result: anyhow::Result<String>, fallback: &str, operation: &str) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!(operation, "Generation returned empty text, using fallback");
            fallback.to_string()
        }
        Err(e) => {
            warn!(operation, error = %e, "Generation failed, using fallback");
            fallback.to_string()
        }
    }
}
