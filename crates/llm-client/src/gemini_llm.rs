//! Gemini implementation of [`LlmClient`] over the `generateContent` REST endpoint.
//!
//! Binary inputs are sent inline (`inline_data`, base64) next to the text prompt.

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{mask_token, LlmClient, DEFAULT_MAX_OUTPUT_TOKENS};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone)]
pub struct GeminiLlmClient {
    api_key: String,
    model: String,
    base_url: String,
    max_output_tokens: u32,
    client: reqwest::Client,
}

impl GeminiLlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Replaces the HTTP client with one that enforces `timeout` per request.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Sends one user turn made of `parts` and returns the concatenated text of the first candidate.
    async fn generate(&self, parts: Vec<Value>) -> Result<String> {
        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens,
            },
        });

        info!(
            model = %self.model,
            parts = body["contents"][0]["parts"].as_array().map(|p| p.len()).unwrap_or(0),
            api_key = %mask_token(&self.api_key),
            "Gemini generateContent request"
        );

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let http_resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body_text, "Gemini API error");
            anyhow::bail!("Gemini API error HTTP {}: {}", status, body_text);
        }

        let resp = http_resp.json::<Value>().await?;

        if let Some(tokens) = resp["usageMetadata"]["candidatesTokenCount"].as_u64() {
            debug!(
                prompt_tokens = resp["usageMetadata"]["promptTokenCount"].as_u64().unwrap_or(0),
                completion_tokens = tokens,
                "Gemini usage"
            );
        }

        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        match extract_text(&parts) {
            Some(text) => Ok(text),
            None => anyhow::bail!("Gemini response contained no text"),
        }
    }
}

fn text_part(text: &str) -> Value {
    json!({ "text": text })
}

fn inline_part(bytes: &[u8], mime_type: &str) -> Value {
    json!({
        "inline_data": {
            "mime_type": mime_type,
            "data": base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    })
}

/// Joins the text parts of a candidate; `None` when there is no non-blank text.
fn extract_text(parts: &[Value]) -> Option<String> {
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl LlmClient for GeminiLlmClient {
    #[instrument(skip(self, prompt))]
    async fn complete_text(&self, prompt: &str) -> Result<String> {
        self.generate(vec![text_part(prompt)]).await
    }

    #[instrument(skip(self, prompt, image), fields(image_len = image.len()))]
    async fn describe_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String> {
        self.generate(vec![text_part(prompt), inline_part(image, mime_type)])
            .await
    }

    #[instrument(skip(self, prompt, document), fields(document_len = document.len()))]
    async fn describe_document(
        &self,
        prompt: &str,
        document: &[u8],
        mime_type: &str,
    ) -> Result<String> {
        self.generate(vec![inline_part(document, mime_type), text_part(prompt)])
            .await
    }
}
