//! OpenAI implementation of [`LlmClient`] on async-openai chat completions.
//!
//! Images are sent as base64 data URLs. Chat completions do not take arbitrary binary
//! attachments, so only textual documents are supported: their content is inlined after the
//! prompt. Other document types return an error (and the facade falls back).

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::{mask_token, LlmClient, DEFAULT_MAX_OUTPUT_TOKENS};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    max_output_tokens: u32,
    masked_key: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_OPENAI_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config).with_backoff(single_attempt())),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            masked_key,
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Rebuilds the underlying client on an HTTP client that enforces `timeout` per request.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        let client = (*self.client).clone().with_http_client(http_client);
        self.client = Arc::new(client);
        Ok(self)
    }

    async fn chat(&self, message: ChatCompletionRequestMessage) -> Result<String> {
        info!(
            model = %self.model,
            api_key = %self.masked_key,
            "OpenAI chat completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(self.max_output_tokens)
            .messages(vec![message])
            .build()?;

        let response = self.client.chat().create(request).await?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("OpenAI response contained no text");
        }
        Ok(text)
    }
}

/// async-openai retries 429 and 5xx answers by default; a zero elapsed-time budget makes the
/// first failure final.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// MIME types whose bytes can be inlined into a chat prompt as UTF-8 text.
fn is_textual_mime(mime_type: &str) -> bool {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("text/")
        || matches!(
            essence.as_str(),
            "application/json" | "application/xml" | "application/x-yaml" | "application/yaml"
        )
}

fn image_data_url(image: &[u8], mime_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(image)
    )
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, prompt))]
    async fn complete_text(&self, prompt: &str) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?
            .into();
        self.chat(message).await
    }

    #[instrument(skip(self, prompt, image), fields(image_len = image.len()))]
    async fn describe_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String> {
        let parts = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: prompt.to_string(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: image_data_url(image, mime_type),
                        detail: None,
                    },
                },
            ),
        ];
        let message = ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Array(parts),
            name: None,
        });
        self.chat(message).await
    }

    #[instrument(skip(self, prompt, document), fields(document_len = document.len()))]
    async fn describe_document(
        &self,
        prompt: &str,
        document: &[u8],
        mime_type: &str,
    ) -> Result<String> {
        if !is_textual_mime(mime_type) {
            anyhow::bail!("OpenAI backend cannot read documents of type {}", mime_type);
        }
        let content = String::from_utf8_lossy(document);
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(format!("{}\n\n{}", prompt, content))
            .build()?
            .into();
        self.chat(message).await
    }
}
