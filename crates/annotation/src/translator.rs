//! Google Translate client on the public `translate_a/single` endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::Translator;

pub const DEFAULT_TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Translates with source-language auto detection.
#[derive(Clone)]
pub struct GoogleTranslator {
    target_lang: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new(target_lang: impl Into<String>) -> Self {
        Self {
            target_lang: target_lang.into(),
            base_url: DEFAULT_TRANSLATE_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }
}

/// Joins the translated segments (`body[0][i][0]`) of a `translate_a/single` response.
fn parse_translation(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    #[instrument(skip(self, text), fields(target = %self.target_lang, text_len = text.len()))]
    async fn translate(&self, text: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", self.target_lang.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("translate request failed")?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Translate API error");
            anyhow::bail!("translate API error HTTP {}", status);
        }

        let body: Value = response
            .json()
            .await
            .context("translate response is not JSON")?;
        let translated =
            parse_translation(&body).context("translate response has no translated text")?;

        debug!(
            source_lang = body.get(2).and_then(serde_json::Value::as_str).unwrap_or("?"),
            "Translated text"
        );
        Ok(translated)
    }
}
