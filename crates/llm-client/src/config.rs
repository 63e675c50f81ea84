//! Generation backend configuration loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    GeminiLlmClient, LlmClient, OpenAILlmClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenAI,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => f.write_str("gemini"),
            LlmProvider::OpenAI => f.write_str("openai"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAI),
            other => anyhow::bail!("unknown generation provider '{}' (expected gemini or openai)", other),
        }
    }
}

/// Settings for the generation backend. Only the selected provider's key is required.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub max_output_tokens: u32,
    pub request_timeout_secs: u64,
}

impl LlmConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let provider = match non_empty_var("GENERATION_PROVIDER") {
            Some(value) => value.parse()?,
            None => LlmProvider::default(),
        };

        let gemini_api_key = non_empty_var("GEMINI_API_KEY");
        let openai_api_key = non_empty_var("OPENAI_API_KEY");
        match provider {
            LlmProvider::Gemini if gemini_api_key.is_none() => {
                anyhow::bail!("GEMINI_API_KEY not set (required when GENERATION_PROVIDER=gemini)")
            }
            LlmProvider::OpenAI if openai_api_key.is_none() => {
                anyhow::bail!("OPENAI_API_KEY not set (required when GENERATION_PROVIDER=openai)")
            }
            _ => {}
        }

        let max_output_tokens = match non_empty_var("MAX_OUTPUT_TOKENS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("MAX_OUTPUT_TOKENS must be a positive integer, got '{}'", value))?,
            None => DEFAULT_MAX_OUTPUT_TOKENS,
        };
        let request_timeout_secs = match non_empty_var("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS must be an integer, got '{}'", value))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            provider,
            gemini_api_key,
            gemini_model: non_empty_var("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            openai_api_key,
            openai_base_url: non_empty_var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: non_empty_var("MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            max_output_tokens,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the client for the selected provider.
    pub fn build_client(&self) -> Result<Arc<dyn LlmClient>> {
        let client: Arc<dyn LlmClient> = match self.provider {
            LlmProvider::Gemini => {
                let api_key = self
                    .gemini_api_key
                    .clone()
                    .context("GEMINI_API_KEY not set")?;
                Arc::new(
                    GeminiLlmClient::new(api_key)
                        .with_model(self.gemini_model.clone())
                        .with_base_url(self.gemini_base_url.clone())
                        .with_max_output_tokens(self.max_output_tokens)
                        .with_timeout(self.request_timeout())?,
                )
            }
            LlmProvider::OpenAI => {
                let api_key = self
                    .openai_api_key
                    .clone()
                    .context("OPENAI_API_KEY not set")?;
                Arc::new(
                    OpenAILlmClient::with_base_url(api_key, self.openai_base_url.clone())
                        .with_model(self.openai_model.clone())
                        .with_max_output_tokens(self.max_output_tokens)
                        .with_timeout(self.request_timeout())?,
                )
            }
        };
        Ok(client)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
